//! Corpus access: an immutable, aggregated view over career → skill-set
//! records.
//!
//! Raw storage rows are not unique per title; the snapshot boundary
//! aggregates every skill mention for a title into one [`CorpusEntry`] so no
//! downstream component ever branches on record shape.

pub mod store;

pub use store::CorpusStore;

use std::collections::BTreeSet;
use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::models::CorpusEntry;

/// Immutable corpus snapshot with insertion-ordered entries, a title lookup
/// and per-skill document frequencies.
///
/// A snapshot never changes once built; refreshing the corpus means building
/// a new snapshot (and a new index) and swapping references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    entries: Vec<CorpusEntry>,
    title_index: HashMap<String, usize>,
    doc_freq: HashMap<String, usize>,
}

impl CorpusSnapshot {
    /// Build a snapshot from raw `(career_title, delimited skills)` records,
    /// aggregating all mentions of a title into one entry.
    ///
    /// Skills are split on commas, trimmed, lower-cased and deduplicated;
    /// blank or one-character fragments are dropped.
    pub fn from_records<I, S1, S2>(records: I) -> Self
    where
        I: IntoIterator<Item = (S1, S2)>,
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let mut entries: Vec<CorpusEntry> = Vec::new();
        let mut title_index: HashMap<String, usize> = HashMap::new();

        for (title, skills) in records {
            let title = title.as_ref().trim();
            if title.is_empty() {
                continue;
            }
            let key = title.to_lowercase();
            let idx = *title_index.entry(key).or_insert_with(|| {
                entries.push(CorpusEntry::new(title));
                entries.len() - 1
            });
            for skill in skills.as_ref().split(',') {
                let skill = skill.trim().to_lowercase();
                if skill.len() > 1 && skill.len() < 30 {
                    entries[idx].skills.insert(skill);
                }
            }
        }

        let doc_freq = document_frequencies(&entries);

        Self {
            entries,
            title_index,
            doc_freq,
        }
    }

    /// Build a snapshot from already-aggregated entries (test and
    /// import/export paths).
    pub fn from_entries(entries: Vec<CorpusEntry>) -> Self {
        let title_index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.career_title.to_lowercase(), i))
            .collect();
        let doc_freq = document_frequencies(&entries);
        Self {
            entries,
            title_index,
            doc_freq,
        }
    }

    /// All entries in corpus insertion order.
    pub fn all_entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Look up an entry by title, case-insensitively.
    pub fn entry_for(&self, career_title: &str) -> Option<&CorpusEntry> {
        self.title_index
            .get(&career_title.trim().to_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// Insertion position of a title, used as the deterministic tie-breaker.
    pub fn position_of(&self, career_title: &str) -> Option<usize> {
        self.title_index.get(&career_title.trim().to_lowercase()).copied()
    }

    /// How many corpus entries mention the given skill.
    pub fn document_frequency(&self, skill: &str) -> usize {
        self.doc_freq.get(skill).copied().unwrap_or(0)
    }

    /// Skill → entry count over the whole corpus.
    pub fn skill_frequencies(&self) -> &HashMap<String, usize> {
        &self.doc_freq
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct skill-list search: entries sharing at least `min_match` skills
    /// with the given set, ordered by match count then match percentage,
    /// ties by insertion order.
    pub fn search_by_skills(
        &self,
        user_skills: &BTreeSet<String>,
        min_match: usize,
    ) -> Vec<SkillSearchHit> {
        let mut hits: Vec<SkillSearchHit> = self
            .entries
            .iter()
            .filter(|e| !e.skills.is_empty())
            .filter_map(|entry| {
                let matching: BTreeSet<String> =
                    entry.skills.intersection(user_skills).cloned().collect();
                if matching.len() < min_match {
                    return None;
                }
                let total = entry.skills.len();
                Some(SkillSearchHit {
                    career_title: entry.career_title.clone(),
                    match_count: matching.len(),
                    match_percentage: matching.len() as f32 / total as f32,
                    matching_skills: matching,
                    total_skills: total,
                })
            })
            .collect();

        // Stable sort keeps insertion order for full ties
        hits.sort_by(|a, b| {
            b.match_count
                .cmp(&a.match_count)
                .then_with(|| {
                    b.match_percentage
                        .partial_cmp(&a.match_percentage)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        hits
    }
}

fn document_frequencies(entries: &[CorpusEntry]) -> HashMap<String, usize> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        for skill in &entry.skills {
            *freq.entry(skill.clone()).or_insert(0) += 1;
        }
    }
    freq
}

/// One hit from [`CorpusSnapshot::search_by_skills`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSearchHit {
    pub career_title: String,
    pub match_count: usize,
    pub matching_skills: BTreeSet<String>,
    pub total_skills: usize,
    pub match_percentage: f32,
}
