//! Heuristic text extraction: resume text and chat turns into comparable
//! profile fragments.
//!
//! Everything in this module is a pure function over its input text plus an
//! [`ExtractorConfig`] carrying the keyword tables. No I/O, no state; the
//! same input always yields the same output.

pub mod academic;
pub mod goals;
pub mod interests;
pub mod profile;
pub mod skills;
pub mod tenure;

pub use academic::extract_academic_info;
pub use academic::AcademicInfo;
pub use goals::extract_career_goals;
pub use goals::CareerGoals;
pub use interests::extract_interests;
pub use profile::parse_resume_text;
pub use skills::extract_skills;
pub use tenure::extract_experience_level;

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// Keyword tables driving the extraction heuristics.
///
/// Kept as data rather than inline literals so deployments can extend the
/// vocabulary without touching control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Function words and resume boilerplate never accepted as skills
    pub deny_list: BTreeSet<String>,
    /// Suffixes marking technical terms (`js`, `sql`, ...)
    pub technical_suffixes: Vec<String>,
    /// Prefixes marking technical terms (`web`, `data`, ...)
    pub technical_prefixes: Vec<String>,
    /// Substrings associated with professional activity (`develop`, ...)
    pub action_roots: Vec<String>,
    /// Known skill vocabulary matched by substring containment, covering
    /// common terms the shape heuristics alone would miss ("python", "excel")
    pub known_skills: Vec<String>,
    /// Interest families: coarse label plus its trigger keywords
    pub interest_families: Vec<(String, Vec<String>)>,
    /// Education-level keywords picked up from resume text
    pub education_keywords: Vec<String>,
    /// Study fields recognized in academic-background turns
    pub study_fields: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let deny_list = [
            "a", "an", "and", "are", "as", "at", "be", "by", "candidate", "excellent",
            "experience", "for", "from", "good", "in", "is", "job", "must", "of", "on", "or",
            "position", "preferred", "required", "role", "should", "strong", "that", "the",
            "this", "to", "was", "were", "with", "work", "years",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            deny_list,
            technical_suffixes: vec_of(&["js", "py", "sql", "db", "api", "ui", "ux"]),
            technical_prefixes: vec_of(&["web", "app", "data", "cloud", "micro"]),
            action_roots: vec_of(&["develop", "engineer", "manage", "analy", "design"]),
            known_skills: vec_of(&[
                "python",
                "java",
                "c++",
                "sql",
                "html",
                "css",
                "javascript",
                "react",
                "angular",
                "node",
                "express",
                "flask",
                "django",
                "pandas",
                "numpy",
                "machine learning",
                "deep learning",
                "tensorflow",
                "keras",
                "pytorch",
                "data analysis",
                "communication",
                "leadership",
                "teamwork",
                "problem solving",
                "cloud",
                "aws",
                "azure",
                "gcp",
                "docker",
                "kubernetes",
                "linux",
                "jira",
                "git",
                "github",
                "rest api",
                "fastapi",
                "power bi",
                "excel",
                "digital marketing",
                "social media",
                "content marketing",
                "google analytics",
                "lead generation",
                "project management",
                "negotiation",
                "statistics",
                "tableau",
            ]),
            interest_families: vec![
                (
                    "Technology".to_string(),
                    vec_of(&[
                        "tech",
                        "programming",
                        "coding",
                        "software",
                        "computer",
                        "ai",
                        "machine learning",
                        "data",
                    ]),
                ),
                (
                    "Business".to_string(),
                    vec_of(&[
                        "business",
                        "management",
                        "marketing",
                        "sales",
                        "finance",
                        "entrepreneurship",
                    ]),
                ),
                (
                    "Creative".to_string(),
                    vec_of(&[
                        "creative",
                        "design",
                        "art",
                        "music",
                        "writing",
                        "photography",
                        "video",
                    ]),
                ),
                (
                    "Healthcare".to_string(),
                    vec_of(&["health", "medical", "doctor", "nurse", "medicine", "biology"]),
                ),
                (
                    "Education".to_string(),
                    vec_of(&["teaching", "education", "training", "academic", "research"]),
                ),
                (
                    "Science".to_string(),
                    vec_of(&["science", "research", "chemistry", "physics", "engineering"]),
                ),
                (
                    "Social".to_string(),
                    vec_of(&[
                        "social",
                        "psychology",
                        "counseling",
                        "human resources",
                        "community",
                    ]),
                ),
            ],
            education_keywords: vec_of(&[
                "bachelor", "master", "phd", "b.tech", "m.tech", "b.sc", "m.sc", "mba", "bca",
                "mca", "bcom", "mcom", "degree", "diploma",
            ]),
            study_fields: vec_of(&[
                "computer science",
                "engineering",
                "business",
                "medicine",
                "arts",
                "science",
            ]),
        }
    }
}

fn vec_of(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Result of running the skill and interest extractors over one text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extracted {
    pub skills: BTreeSet<String>,
    pub interests: Vec<String>,
}

/// Extract skills and interests from free text in one pass.
pub fn extract(text: &str, config: &ExtractorConfig) -> Extracted {
    Extracted {
        skills: extract_skills(text, config),
        interests: extract_interests(text, config),
    }
}
