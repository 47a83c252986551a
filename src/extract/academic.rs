//! Academic-background extraction for the guidance conversation.

use serde::Deserialize;
use serde::Serialize;

use super::ExtractorConfig;

/// Education level recognized from a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    HighSchool,
    Bachelors,
    Masters,
    Phd,
    Other,
}

impl EducationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Bachelors => "Bachelor's",
            EducationLevel::Masters => "Master's",
            EducationLevel::Phd => "PhD",
            EducationLevel::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicInfo {
    pub level: EducationLevel,
    pub field: Option<String>,
}

/// Recognize education level and field of study from free text.
pub fn extract_academic_info(text: &str, config: &ExtractorConfig) -> AcademicInfo {
    let text_lower = text.to_lowercase();

    let level = if contains_any(&text_lower, &["high school", "secondary", "12th"]) {
        EducationLevel::HighSchool
    } else if contains_any(&text_lower, &["bachelor", "undergraduate", "btech", "bsc", "ba"]) {
        EducationLevel::Bachelors
    } else if contains_any(&text_lower, &["master", "mtech", "msc", "mba", "ma"]) {
        EducationLevel::Masters
    } else if contains_any(&text_lower, &["phd", "doctorate"]) {
        EducationLevel::Phd
    } else {
        EducationLevel::Other
    };

    let field = config
        .study_fields
        .iter()
        .find(|f| text_lower.contains(f.as_str()))
        .map(|f| title_case(f));

    AcademicInfo { level, field }
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
