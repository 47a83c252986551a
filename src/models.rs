use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// One career record in the corpus: a title and the set of skills
/// mentioned across all source rows for that title.
///
/// Skills are lower-cased and deduplicated at the accessor boundary; a
/// `BTreeSet` keeps iteration order deterministic for ranking output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub career_title: String,
    pub skills: BTreeSet<String>,
}

impl CorpusEntry {
    pub fn new(career_title: impl Into<String>) -> Self {
        Self {
            career_title: career_title.into(),
            skills: BTreeSet::new(),
        }
    }

    /// Text surface used for embedding: title concatenated with skills.
    pub fn embedding_text(&self) -> String {
        let skills: Vec<&str> = self.skills.iter().map(String::as_str).collect();
        format!("{} {}", self.career_title, skills.join(" "))
    }
}

/// A structured work experience item parsed from a resume.
/// Absent fields are `None`, never placeholder strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub role: Option<String>,
    pub company: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

/// Profile derived deterministically from resume text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub raw_text: String,
    pub skills: BTreeSet<String>,
    pub education: BTreeSet<String>,
    pub experience: Vec<ExperienceItem>,
}

impl ResumeProfile {
    /// Combined text used as the retrieval query: skills, education and all
    /// experience fields joined into one surface.
    pub fn query_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.skills.is_empty() {
            parts.push(self.skills.iter().cloned().collect::<Vec<_>>().join(" "));
        }
        if !self.education.is_empty() {
            parts.push(self.education.iter().cloned().collect::<Vec<_>>().join(" "));
        }
        for exp in &self.experience {
            let fields: Vec<&str> = [
                exp.role.as_deref(),
                exp.company.as_deref(),
                exp.duration.as_deref(),
                exp.description.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !fields.is_empty() {
                parts.push(fields.join(" "));
            }
        }
        parts.join(" ")
    }
}

/// Coarse confidence bucket derived from a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Confidence {
    /// Bucket boundaries: 0.9 / 0.7 / 0.5, inclusive at the lower edge.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.9 {
            Confidence::VeryHigh
        } else if score >= 0.7 {
            Confidence::High
        } else if score >= 0.5 {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Moderate => "moderate",
            Confidence::High => "high",
            Confidence::VeryHigh => "very high",
        }
    }
}

/// Which strategy produced a ranked result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Vector index similarity search
    Semantic,
    /// IDF-weighted skill overlap over the raw corpus
    Fallback,
}

impl MatchMethod {
    pub fn label(self) -> &'static str {
        match self {
            MatchMethod::Semantic => "semantic",
            MatchMethod::Fallback => "fallback",
        }
    }
}

/// One ranked career match. Produced fresh per ranking call and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub career_title: String,
    /// Final score in [0, 1], from a single documented formula per mode
    pub score: f32,
    pub confidence: Confidence,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub explanation: Vec<String>,
}

/// Single-career skill-match breakdown returned by `analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub career_title: String,
    /// IDF-weighted fraction of required skills present in the profile
    pub match_percentage: f32,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub total_required: usize,
    /// Up to ten representative skills for the career
    pub key_skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bucket_boundaries() {
        assert_eq!(Confidence::from_score(0.9), Confidence::VeryHigh);
        assert_eq!(Confidence::from_score(0.95), Confidence::VeryHigh);
        assert_eq!(Confidence::from_score(0.7), Confidence::High);
        assert_eq!(Confidence::from_score(0.899), Confidence::High);
        assert_eq!(Confidence::from_score(0.5), Confidence::Moderate);
        assert_eq!(Confidence::from_score(0.6999), Confidence::Moderate);
        assert_eq!(Confidence::from_score(0.4999), Confidence::Low);
        assert_eq!(Confidence::from_score(0.0), Confidence::Low);
    }

    #[test]
    fn test_corpus_entry_embedding_text() {
        let mut entry = CorpusEntry::new("Data Analyst");
        entry.skills.insert("sql".to_string());
        entry.skills.insert("excel".to_string());
        // BTreeSet iterates alphabetically
        assert_eq!(entry.embedding_text(), "Data Analyst excel sql");
    }

    #[test]
    fn test_profile_query_text_joins_all_fields() {
        let mut profile = ResumeProfile {
            raw_text: "ignored here".to_string(),
            ..Default::default()
        };
        profile.skills.insert("python".to_string());
        profile.education.insert("bachelor".to_string());
        profile.experience.push(ExperienceItem {
            role: Some("Developer".to_string()),
            company: Some("Acme".to_string()),
            duration: None,
            description: Some("built services".to_string()),
        });

        let text = profile.query_text();
        assert!(text.contains("python"));
        assert!(text.contains("bachelor"));
        assert!(text.contains("Developer Acme built services"));
    }

    #[test]
    fn test_empty_profile_query_text() {
        let profile = ResumeProfile::default();
        assert!(profile.query_text().is_empty());
    }
}
