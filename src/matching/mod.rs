//! Hybrid career ranking: semantic retrieval when the index is available,
//! IDF-weighted skill overlap otherwise.
//!
//! Score contracts (never mixed within one response):
//! - Semantic mode: `score` is the retriever's cosine similarity, clamped to
//!   [0, 1]; skill overlap is reported for explanation only.
//! - Fallback mode: `score` is the IDF-weighted match percentage plus a 0.3
//!   bonus per interest label found in the title, capped at 1.0.
//!
//! In both modes `matched_skills`/`missing_skills` are plain set
//! intersection/difference against the corpus entry.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use strsim::jaro_winkler;
use tracing::debug;
use tracing::warn;

use crate::corpus::CorpusSnapshot;
use crate::embeddings::EmbeddingService;
use crate::errors::CareerPathError;
use crate::errors::Result;
use crate::index::IndexHolder;
use crate::models::Confidence;
use crate::models::CorpusEntry;
use crate::models::MatchMethod;
use crate::models::MatchResult;
use crate::models::SkillMatch;

/// Candidates below this score are noise (e.g. a single weak skill hit)
const MIN_SCORE: f32 = 0.1;

/// Fixed bonus per interest label appearing in a career title
const INTEREST_BONUS: f32 = 0.3;

/// Minimum jaro-winkler similarity for fuzzy title resolution
const FUZZY_TITLE_THRESHOLD: f64 = 0.7;

/// Semantic mode fetches extra candidates before re-ranking
const CANDIDATE_FACTOR: usize = 2;

/// The profile shape the ranker consumes: a normalized skill set, coarse
/// interest labels and the free-text surface used for the query embedding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankProfile {
    pub skills: BTreeSet<String>,
    pub interests: Vec<String>,
    pub query_text: String,
}

/// A ranked result list labeled with the strategy that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatches {
    pub method: MatchMethod,
    pub results: Vec<MatchResult>,
}

/// Hybrid ranker over one corpus snapshot.
pub struct Ranker {
    snapshot: Arc<CorpusSnapshot>,
    index: Arc<IndexHolder>,
    embeddings: Option<Arc<EmbeddingService>>,
}

impl Ranker {
    pub fn new(
        snapshot: Arc<CorpusSnapshot>,
        index: Arc<IndexHolder>,
        embeddings: Option<Arc<EmbeddingService>>,
    ) -> Self {
        Self {
            snapshot,
            index,
            embeddings,
        }
    }

    /// Rank careers against a profile. Degrades to fallback mode when the
    /// index or the embedding collaborator is unavailable; never fails for
    /// an empty profile or corpus (the result list is just empty).
    pub async fn rank(&self, profile: &RankProfile, top_n: usize) -> RankedMatches {
        if let Some(index) = self.index.available() {
            if let Some(embeddings) = &self.embeddings {
                if !profile.query_text.trim().is_empty() {
                    match embeddings.embed(&profile.query_text).await {
                        Ok(query) => {
                            let hits =
                                index.query_vector(&query, top_n.saturating_mul(CANDIDATE_FACTOR));
                            return RankedMatches {
                                method: MatchMethod::Semantic,
                                results: self.rank_semantic(profile, hits, top_n),
                            };
                        }
                        Err(e) => {
                            warn!("Embedding query failed ({e}); using fallback ranking");
                        }
                    }
                }
            }
        }

        debug!("Vector index unavailable; ranking by skill overlap");
        RankedMatches {
            method: MatchMethod::Fallback,
            results: self.rank_fallback(profile, top_n),
        }
    }

    /// Rank without touching the index at all (pure, synchronous path).
    pub fn rank_fallback_only(&self, profile: &RankProfile, top_n: usize) -> RankedMatches {
        RankedMatches {
            method: MatchMethod::Fallback,
            results: self.rank_fallback(profile, top_n),
        }
    }

    fn rank_semantic(
        &self,
        profile: &RankProfile,
        hits: Vec<(String, f32)>,
        top_n: usize,
    ) -> Vec<MatchResult> {
        let mut results: Vec<(MatchResult, usize, usize)> = Vec::new();

        for (title, similarity) in hits {
            // A hit with no corpus entry is a corrupt record: skip it, never
            // abort the whole pass
            let Some(entry) = self.snapshot.entry_for(&title) else {
                warn!("Index hit '{title}' has no corpus entry; skipping");
                continue;
            };
            let position = self.snapshot.position_of(&title).unwrap_or(usize::MAX);

            let matched: BTreeSet<String> =
                entry.skills.intersection(&profile.skills).cloned().collect();
            let missing: BTreeSet<String> =
                entry.skills.difference(&profile.skills).cloned().collect();

            let score = similarity.clamp(0.0, 1.0);
            if score <= MIN_SCORE {
                continue;
            }

            let explanation = build_explanation(entry, matched.len(), &profile.interests);
            let overlap = matched.len();
            results.push((
                MatchResult {
                    career_title: entry.career_title.clone(),
                    score,
                    confidence: Confidence::from_score(score),
                    matched_skills: matched,
                    missing_skills: missing,
                    explanation,
                },
                overlap,
                position,
            ));
        }

        order_and_truncate(results, top_n)
    }

    fn rank_fallback(&self, profile: &RankProfile, top_n: usize) -> Vec<MatchResult> {
        let mut results: Vec<(MatchResult, usize, usize)> = Vec::new();

        for (position, entry) in self.snapshot.all_entries().iter().enumerate() {
            // Empty skill sets would make the IDF denominator zero; such
            // entries are excluded entirely
            if entry.skills.is_empty() {
                continue;
            }

            let matched: BTreeSet<String> =
                entry.skills.intersection(&profile.skills).cloned().collect();
            let missing: BTreeSet<String> =
                entry.skills.difference(&profile.skills).cloned().collect();

            let total_weight: f32 = entry
                .skills
                .iter()
                .map(|s| idf_weight(self.snapshot.document_frequency(s)))
                .sum();
            let matched_weight: f32 = matched
                .iter()
                .map(|s| idf_weight(self.snapshot.document_frequency(s)))
                .sum();
            let match_percentage = if total_weight > 0.0 {
                matched_weight / total_weight
            } else {
                0.0
            };

            let bonus = interest_title_bonus(&entry.career_title, &profile.interests);
            let score = (match_percentage + bonus).min(1.0);
            if score <= MIN_SCORE {
                continue;
            }

            let explanation = build_explanation(entry, matched.len(), &profile.interests);
            let overlap = matched.len();
            results.push((
                MatchResult {
                    career_title: entry.career_title.clone(),
                    score,
                    confidence: Confidence::from_score(score),
                    matched_skills: matched,
                    missing_skills: missing,
                    explanation,
                },
                overlap,
                position,
            ));
        }

        order_and_truncate(results, top_n)
    }

    /// Single-career skill-match breakdown. Unknown titles are resolved via
    /// fuzzy nearest-title lookup; below the similarity threshold this is an
    /// explicit not-found, never a guess.
    pub fn analyze(&self, profile: &RankProfile, career_title: &str) -> Result<SkillMatch> {
        let entry = match self.snapshot.entry_for(career_title) {
            Some(entry) => entry,
            None => self
                .nearest_title(career_title)
                .ok_or_else(|| CareerPathError::CareerNotFound(career_title.to_string()))?,
        };

        let text_lower = profile.query_text.to_lowercase();
        let matched: BTreeSet<String> = entry
            .skills
            .iter()
            .filter(|s| profile.skills.contains(*s) || text_lower.contains(s.as_str()))
            .cloned()
            .collect();
        let missing: BTreeSet<String> =
            entry.skills.difference(&matched).cloned().collect();

        let total_weight: f32 = entry
            .skills
            .iter()
            .map(|s| idf_weight(self.snapshot.document_frequency(s)))
            .sum();
        let matched_weight: f32 = matched
            .iter()
            .map(|s| idf_weight(self.snapshot.document_frequency(s)))
            .sum();
        let match_percentage = if total_weight > 0.0 {
            matched_weight / total_weight
        } else {
            0.0
        };

        Ok(SkillMatch {
            career_title: entry.career_title.clone(),
            match_percentage,
            matched_skills: matched,
            missing_skills: missing,
            total_required: entry.skills.len(),
            key_skills: entry.skills.iter().take(10).cloned().collect(),
        })
    }

    /// Closest corpus title by jaro-winkler similarity, if any clears the
    /// threshold. Ties resolve to the earlier corpus entry.
    fn nearest_title(&self, career_title: &str) -> Option<&CorpusEntry> {
        let needle = career_title.trim().to_lowercase();
        let mut best: Option<(&CorpusEntry, f64)> = None;

        for entry in self.snapshot.all_entries() {
            let candidate = entry.career_title.to_lowercase();
            let similarity = jaro_winkler(&needle, &candidate);
            if similarity >= FUZZY_TITLE_THRESHOLD
                && best.map_or(true, |(_, s)| similarity > s)
            {
                best = Some((entry, similarity));
            }
        }

        best.map(|(entry, _)| entry)
    }
}

/// IDF weight for a skill: rare skills count more than ubiquitous ones.
fn idf_weight(document_frequency: usize) -> f32 {
    1.0 / (1.0 + (1.0 + document_frequency as f32).ln())
}

fn interest_title_bonus(career_title: &str, interests: &[String]) -> f32 {
    let title_lower = career_title.to_lowercase();
    interests
        .iter()
        .filter(|i| title_lower.contains(&i.to_lowercase()))
        .count() as f32
        * INTEREST_BONUS
}

/// Order by score desc, then overlap count desc, then corpus insertion
/// order, and truncate to `top_n`. Stable and deterministic.
fn order_and_truncate(
    mut results: Vec<(MatchResult, usize, usize)>,
    top_n: usize,
) -> Vec<MatchResult> {
    results.sort_by(|a, b| {
        b.0.score
            .partial_cmp(&a.0.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.2.cmp(&b.2))
    });
    results.truncate(top_n);
    results.into_iter().map(|(r, _, _)| r).collect()
}

/// Human-readable reasons built strictly from the scoring signals.
fn build_explanation(entry: &CorpusEntry, overlap: usize, interests: &[String]) -> Vec<String> {
    let mut reasons = Vec::new();

    if overlap > 0 {
        reasons.push(format!("{overlap} relevant skills matched"));
    }

    let title_lower = entry.career_title.to_lowercase();
    for interest in interests {
        if title_lower.contains(&interest.to_lowercase()) {
            reasons.push(format!("aligns with declared interest {interest}"));
        }
    }

    if title_lower.contains("engineer") || title_lower.contains("developer") {
        reasons.push("high demand occupation family".to_string());
    }

    if reasons.is_empty() {
        reasons.push("good match based on your profile".to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::VectorIndex;

    fn snapshot() -> Arc<CorpusSnapshot> {
        Arc::new(CorpusSnapshot::from_records([
            ("Data Analyst", "sql, excel, python"),
            ("Data Scientist", "python, sql, machine learning"),
        ]))
    }

    fn profile(skills: &[&str]) -> RankProfile {
        RankProfile {
            skills: skills.iter().map(|s| (*s).to_string()).collect(),
            interests: vec![],
            query_text: skills.join(" "),
        }
    }

    fn fallback_ranker(snapshot: Arc<CorpusSnapshot>) -> Ranker {
        Ranker::new(snapshot, Arc::new(IndexHolder::empty()), None)
    }

    #[tokio::test]
    async fn test_fallback_when_index_unavailable() {
        let ranker = fallback_ranker(snapshot());
        let ranked = ranker.rank(&profile(&["python", "sql"]), 5).await;
        assert_eq!(ranked.method, MatchMethod::Fallback);
        assert_eq!(ranked.results.len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_tie_breaks_by_insertion_order() {
        // Both entries share the profile's two skills and have three skills
        // each with equal document frequencies except the unique third skill
        let snap = Arc::new(CorpusSnapshot::from_records([
            ("Data Analyst", "sql, excel, python"),
            ("Data Scientist", "python, sql, excel"),
        ]));
        let ranker = fallback_ranker(snap);
        let ranked = ranker.rank(&profile(&["python", "sql"]), 5).await;
        assert_eq!(ranked.results[0].career_title, "Data Analyst");
        assert_eq!(ranked.results[1].career_title, "Data Scientist");
        assert!((ranked.results[0].score - ranked.results[1].score).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_fallback_equal_weights_match_percentage() {
        // With equal IDF weights the weighted percentage equals the plain
        // fraction: 2 of 3 skills matched
        let ranker = fallback_ranker(Arc::new(CorpusSnapshot::from_records([
            ("Data Analyst", "sql, excel, python"),
            ("Data Scientist", "python, sql, excel"),
        ])));
        let ranked = ranker.rank(&profile(&["python", "sql"]), 5).await;
        for result in &ranked.results {
            assert!((result.score - 2.0 / 3.0).abs() < 1e-5);
        }
    }

    #[tokio::test]
    async fn test_fallback_excludes_empty_skill_entries() {
        let snap = Arc::new(CorpusSnapshot::from_records([
            ("Ghost Career", ""),
            ("Data Analyst", "sql, python"),
        ]));
        let ranker = fallback_ranker(snap);
        let ranked = ranker.rank(&profile(&["python", "sql"]), 5).await;
        assert_eq!(ranked.results.len(), 1);
        assert_eq!(ranked.results[0].career_title, "Data Analyst");
    }

    #[tokio::test]
    async fn test_fallback_threshold_suppresses_noise() {
        let ranker = fallback_ranker(snapshot());
        let ranked = ranker.rank(&profile(&["cobol"]), 5).await;
        assert!(ranked.results.is_empty());
    }

    #[tokio::test]
    async fn test_interest_bonus_and_cap() {
        let snap = Arc::new(CorpusSnapshot::from_records([(
            "Technology Manager",
            "python, sql",
        )]));
        let ranker = fallback_ranker(snap);
        let mut p = profile(&["python", "sql"]);
        p.interests = vec!["Technology".to_string()];
        let ranked = ranker.rank(&p, 5).await;
        // Full overlap (1.0) plus the 0.3 bonus stays capped at 1.0
        assert!((ranked.results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(ranked.results[0].confidence, Confidence::VeryHigh);
    }

    #[tokio::test]
    async fn test_empty_profile_empty_results() {
        let ranker = fallback_ranker(snapshot());
        let ranked = ranker.rank(&profile(&[]), 5).await;
        assert_eq!(ranked.method, MatchMethod::Fallback);
        assert!(ranked.results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_corpus_empty_results() {
        let ranker = fallback_ranker(Arc::new(CorpusSnapshot::from_records(
            Vec::<(&str, &str)>::new(),
        )));
        let ranked = ranker.rank(&profile(&["python"]), 5).await;
        assert!(ranked.results.is_empty());
    }

    #[tokio::test]
    async fn test_determinism() {
        let ranker = fallback_ranker(snapshot());
        let p = profile(&["python", "sql", "excel"]);
        let a = ranker.rank(&p, 5).await;
        let b = ranker.rank(&p, 5).await;
        assert_eq!(
            serde_json::to_string(&a.results).unwrap(),
            serde_json::to_string(&b.results).unwrap()
        );
    }

    #[test]
    fn test_semantic_mode_uses_similarity_as_score() {
        let snap = snapshot();
        let holder = Arc::new(IndexHolder::empty());
        holder.swap(
            VectorIndex::from_vectors(
                vec!["Data Analyst".to_string(), "Data Scientist".to_string()],
                vec![vec![1.0, 0.0], vec![0.6, 0.8]],
            )
            .unwrap(),
        );
        let ranker = Ranker::new(snap, holder.clone(), None);
        let hits = holder.available().unwrap().query_vector(&[1.0, 0.0], 4);
        let results = ranker.rank_semantic(&profile(&["python"]), hits, 5);

        assert_eq!(results[0].career_title, "Data Analyst");
        assert!((results[0].score - 1.0).abs() < 1e-5);
        assert!((results[1].score - 0.6).abs() < 1e-5);
        // Overlap reported independently of the score formula
        assert!(results[0].matched_skills.contains("python"));
        assert!(results[0].missing_skills.contains("sql"));
    }

    #[test]
    fn test_semantic_mode_skips_unknown_titles() {
        let ranker = fallback_ranker(snapshot());
        let hits = vec![("No Such Career".to_string(), 0.9)];
        let results = ranker.rank_semantic(&profile(&["python"]), hits, 5);
        assert!(results.is_empty());
    }

    #[test]
    fn test_analyze_exact_title() {
        let ranker = fallback_ranker(snapshot());
        let analysis = ranker
            .analyze(&profile(&["python", "sql"]), "Data Analyst")
            .unwrap();
        assert_eq!(analysis.career_title, "Data Analyst");
        assert_eq!(analysis.total_required, 3);
        assert!(analysis.matched_skills.contains("python"));
        assert!(analysis.missing_skills.contains("excel"));
        assert!(analysis.match_percentage > 0.0 && analysis.match_percentage < 1.0);
    }

    #[test]
    fn test_analyze_fuzzy_title() {
        let ranker = fallback_ranker(snapshot());
        let analysis = ranker
            .analyze(&profile(&["python"]), "Data Analysts")
            .unwrap();
        assert_eq!(analysis.career_title, "Data Analyst");
    }

    #[test]
    fn test_analyze_unknown_title_not_found() {
        let ranker = fallback_ranker(snapshot());
        let result = ranker.analyze(&profile(&["python"]), "Quantum Chef");
        assert!(matches!(
            result,
            Err(CareerPathError::CareerNotFound(_))
        ));
    }

    #[test]
    fn test_idf_weight_decreases_with_frequency() {
        assert!(idf_weight(0) > idf_weight(1));
        assert!(idf_weight(1) > idf_weight(10));
        assert!(idf_weight(100) > 0.0);
    }

    #[test]
    fn test_explanations_derive_from_signals() {
        let mut entry = CorpusEntry::new("Software Engineer");
        entry.skills.insert("python".to_string());
        let reasons = build_explanation(&entry, 2, &[String::from("Technology")]);
        assert!(reasons.iter().any(|r| r.contains("2 relevant skills")));
        assert!(reasons.iter().any(|r| r.contains("high demand")));

        let none = build_explanation(&CorpusEntry::new("Florist"), 0, &[]);
        assert_eq!(none, vec!["good match based on your profile".to_string()]);
    }
}
