//! Skill extraction from free text.
//!
//! Candidates are single tokens plus 2-3 word windows; a candidate is kept
//! when it looks like a technical or professional term (acronym shape,
//! version markers, known suffixes/prefixes, action roots) or appears in the
//! known-skill vocabulary. Deterministic and I/O-free.

use std::collections::BTreeSet;

use super::ExtractorConfig;

/// Disallowed punctuation anywhere in a skill token
const DENIED_PUNCT: &[char] = &['@', '$', '%', '&', '*', '(', ')', '[', ']'];

const MIN_SKILL_LEN: usize = 2;
const MAX_SKILL_LEN: usize = 30;

/// Extract a lower-cased, deduplicated skill set from free text.
///
/// Empty or whitespace-only input yields an empty set, never an error.
pub fn extract_skills(text: &str, config: &ExtractorConfig) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();
    if text.trim().is_empty() {
        return skills;
    }

    let tokens = tokenize(text);

    // Single-token candidates
    for token in &tokens {
        consider(token, 1, config, &mut skills);
    }

    // 2-3 word windows; windows containing a denied word are noise
    for width in 2..=3 {
        for window in tokens.windows(width) {
            if window
                .iter()
                .any(|w| config.deny_list.contains(&w.to_lowercase()))
            {
                continue;
            }
            let phrase = window.join(" ");
            consider(&phrase, width, config, &mut skills);
        }
    }

    // Known vocabulary matched by containment against the whole text
    let text_lower = text.to_lowercase();
    for skill in &config.known_skills {
        if text_lower.contains(skill.as_str()) {
            skills.insert(skill.clone());
        }
    }

    skills
}

/// Split text into word tokens, keeping version/punctuation markers that are
/// part of the term (`c++`, `node.js`) but stripping sentence punctuation.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';' || c == '/' || c == ':')
        .map(|raw| raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#')))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn consider(candidate: &str, words: usize, config: &ExtractorConfig, out: &mut BTreeSet<String>) {
    let lower = candidate.to_lowercase();
    if is_rejected(&lower, config) {
        return;
    }
    if !is_accepted(candidate, &lower, words, config) {
        return;
    }
    if (MIN_SKILL_LEN..=MAX_SKILL_LEN).contains(&lower.len()) {
        out.insert(lower);
    }
}

fn is_rejected(lower: &str, config: &ExtractorConfig) -> bool {
    lower.is_empty()
        || lower.chars().all(|c| c.is_ascii_digit())
        || lower.chars().any(|c| DENIED_PUNCT.contains(&c))
        || config.deny_list.contains(lower)
}

fn is_accepted(original: &str, lower: &str, words: usize, config: &ExtractorConfig) -> bool {
    // (a) short with an uppercase letter, suggesting an acronym (SQL, AWS)
    if original.len() <= 5 && original.chars().any(char::is_uppercase) {
        return true;
    }
    // (b) version/punctuation marker, but not a leading dash
    if !lower.starts_with('-')
        && lower.chars().any(|c| matches!(c, '+' | '#' | '.' | '-'))
    {
        return true;
    }
    // (c) known technical suffix
    if config.technical_suffixes.iter().any(|s| lower.ends_with(s.as_str())) {
        return true;
    }
    // (d) known technical prefix
    if config.technical_prefixes.iter().any(|p| lower.starts_with(p.as_str())) {
        return true;
    }
    // (e) short multi-word phrase
    if (2..=3).contains(&words) {
        return true;
    }
    // (f) action root associated with professional activity
    if config.action_roots.iter().any(|r| lower.contains(r.as_str())) {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractorConfig {
        ExtractorConfig::default()
    }

    #[test]
    fn test_acronyms_accepted() {
        let skills = extract_skills("Proficient in SQL and AWS", &config());
        assert!(skills.contains("sql"));
        assert!(skills.contains("aws"));
    }

    #[test]
    fn test_version_markers_accepted() {
        let skills = extract_skills("worked with c++ and node.js daily", &config());
        assert!(skills.contains("c++"));
        assert!(skills.contains("node.js"));
    }

    #[test]
    fn test_known_vocabulary_accepted() {
        let skills = extract_skills("python, excel and machine learning", &config());
        assert!(skills.contains("python"));
        assert!(skills.contains("excel"));
        assert!(skills.contains("machine learning"));
    }

    #[test]
    fn test_prefix_and_suffix_rules() {
        let skills = extract_skills("shipped webassembly modules and a graphql api", &config());
        assert!(skills.contains("webassembly"));
        // "api" itself matches the suffix rule
        assert!(skills.contains("api"));
    }

    #[test]
    fn test_all_outputs_lowercase_and_bounded() {
        let skills = extract_skills(
            "Senior Python Developer with SQL, Machine Learning and REST API design",
            &config(),
        );
        for skill in &skills {
            assert_eq!(skill, &skill.to_lowercase());
            assert!(skill.len() >= 2 && skill.len() <= 30, "bad length: {skill}");
            assert!(!skill.chars().all(|c| c.is_ascii_digit()));
            assert!(!skill.chars().any(|c| DENIED_PUNCT.contains(&c)));
        }
    }

    #[test]
    fn test_pure_digits_rejected() {
        let skills = extract_skills("2020 2021 12345", &config());
        assert!(skills.is_empty());
    }

    #[test]
    fn test_denied_punctuation_rejected() {
        let skills = extract_skills("email me @john (urgent) [now] 100%", &config());
        assert!(skills.iter().all(|s| !s.contains('@') && !s.contains('%')));
    }

    #[test]
    fn test_deny_list_rejected() {
        let skills = extract_skills("required experience preferred", &config());
        assert!(!skills.contains("required"));
        assert!(!skills.contains("experience"));
        assert!(!skills.contains("preferred"));
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_skills("", &config()).is_empty());
        assert!(extract_skills("   \n ", &config()).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "Python developer with SQL, AWS and machine learning background";
        let a = extract_skills(text, &config());
        let b = extract_skills(text, &config());
        assert_eq!(a, b);
    }
}
