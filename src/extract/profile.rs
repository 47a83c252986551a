//! Resume text parsing into a structured [`ResumeProfile`].

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::skills::extract_skills;
use super::ExtractorConfig;
use crate::models::ExperienceItem;
use crate::models::ResumeProfile;

fn section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)(professional experience|work experience)(.*?)(education|projects|certifications|achievements|skills|$)",
        )
        .expect("valid experience section regex")
    })
}

fn role_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Marketing Manager | Hindustan Unilever Ltd." style block headers
    RE.get_or_init(|| Regex::new(r"[A-Z][A-Za-z\s]+ \| ").expect("valid role header regex"))
}

fn role_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z][A-Za-z\s]+)\s*\|\s*([A-Za-z&\s\.]+)").expect("valid role regex")
    })
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z]{3,9}\s*\d{4})\s*[-–]\s*([A-Za-z]{3,9}\s*\d{4}|Present)")
            .expect("valid duration regex")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Parse raw resume text into a profile. Deterministic; empty text yields an
/// empty profile rather than an error.
pub fn parse_resume_text(text: &str, config: &ExtractorConfig) -> ResumeProfile {
    ResumeProfile {
        raw_text: text.trim().to_string(),
        skills: extract_skills(text, config),
        education: extract_education(text, config),
        experience: extract_experience(text),
    }
}

/// Education-level keywords found in the text, lower-cased and deduplicated.
pub fn extract_education(text: &str, config: &ExtractorConfig) -> BTreeSet<String> {
    let text_lower = text.to_lowercase();
    config
        .education_keywords
        .iter()
        .filter(|k| text_lower.contains(k.as_str()))
        .cloned()
        .collect()
}

/// Extract structured experience items from a resume's experience section.
///
/// Blocks shaped like `Role | Company ... Mon YYYY - Mon YYYY ...` become one
/// item each; fields that cannot be parsed stay `None`.
pub fn extract_experience(text: &str) -> Vec<ExperienceItem> {
    let mut items = Vec::new();

    let Some(section) = section_re().captures(text) else {
        return items;
    };
    let Some(body) = section.get(2) else {
        return items;
    };
    let body = body.as_str();

    // Split the section at each role header (the regex crate has no
    // lookahead, so split manually at the match starts)
    let starts: Vec<usize> = role_header_re().find_iter(body).map(|m| m.start()).collect();
    if starts.is_empty() {
        return items;
    }

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(body.len());
        let block = body[start..end].trim();
        if block.len() < 30 {
            continue;
        }

        let role_caps = role_re().captures(block);
        let duration_caps = duration_re().captures(block);

        let role = role_caps
            .as_ref()
            .map(|c| c.get(1).map_or("", |m| m.as_str()).trim().to_string())
            .filter(|s| !s.is_empty());
        let company = role_caps
            .as_ref()
            .map(|c| c.get(2).map_or("", |m| m.as_str()).trim().to_string())
            .filter(|s| !s.is_empty());
        let duration = duration_caps.as_ref().map(|c| {
            format!(
                "{} - {}",
                c.get(1).map_or("", |m| m.as_str()),
                c.get(2).map_or("", |m| m.as_str())
            )
        });

        // Description: everything after the duration (or the role header)
        let desc_start = duration_caps
            .as_ref()
            .and_then(|c| c.get(0))
            .map(|m| m.end())
            .or_else(|| role_caps.as_ref().and_then(|c| c.get(0)).map(|m| m.end()));
        let description = desc_start
            .map(|at| whitespace_re().replace_all(block[at..].trim(), " ").to_string())
            .filter(|s| !s.is_empty());

        if role.is_some() {
            items.push(ExperienceItem {
                role,
                company,
                duration,
                description,
            });
        }
    }

    items
}
