//! Experience-level extraction from tenure phrases.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    Some,
    Junior,
    Senior,
}

impl ExperienceLevel {
    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Some => "Some Experience",
            ExperienceLevel::Junior => "Junior Level",
            ExperienceLevel::Senior => "Senior Level",
        }
    }
}

/// Map tenure phrases onto a coarse experience level. Unrecognized input
/// defaults to entry level.
pub fn extract_experience_level(text: &str) -> ExperienceLevel {
    let text_lower = text.to_lowercase();

    if ["fresh", "graduate", "no experience", "student"]
        .iter()
        .any(|t| text_lower.contains(t))
    {
        ExperienceLevel::Entry
    } else if ["internship", "part-time"].iter().any(|t| text_lower.contains(t)) {
        ExperienceLevel::Some
    } else if ["1-3", "1 to 3", "few years"].iter().any(|t| text_lower.contains(t)) {
        ExperienceLevel::Junior
    } else if ["3+", "experienced", "senior"].iter().any(|t| text_lower.contains(t)) {
        ExperienceLevel::Senior
    } else {
        ExperienceLevel::Entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_graduate() {
        assert_eq!(
            extract_experience_level("fresh graduate, no experience"),
            ExperienceLevel::Entry
        );
    }

    #[test]
    fn test_internship() {
        assert_eq!(
            extract_experience_level("did an internship last summer"),
            ExperienceLevel::Some
        );
    }

    #[test]
    fn test_junior_years() {
        assert_eq!(
            extract_experience_level("about 1-3 years of professional work"),
            ExperienceLevel::Junior
        );
    }

    #[test]
    fn test_senior() {
        assert_eq!(
            extract_experience_level("3+ years, quite experienced"),
            ExperienceLevel::Senior
        );
    }

    #[test]
    fn test_default_entry() {
        assert_eq!(extract_experience_level("hmm"), ExperienceLevel::Entry);
    }
}
