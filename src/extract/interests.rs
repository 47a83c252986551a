//! Interest extraction via keyword-family matching.

use super::ExtractorConfig;

/// Sentinel label when no interest family matches.
pub const UNCLASSIFIED: &str = "General";

/// Map free text onto coarse interest labels by substring containment
/// against each family's keywords. Returns at least one label: the
/// unclassified sentinel when nothing matches.
pub fn extract_interests(text: &str, config: &ExtractorConfig) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut interests: Vec<String> = Vec::new();

    for (label, keywords) in &config.interest_families {
        if keywords.iter().any(|k| text_lower.contains(k.as_str())) {
            interests.push(label.clone());
        }
    }

    if interests.is_empty() {
        interests.push(UNCLASSIFIED.to_string());
    }
    interests
}
