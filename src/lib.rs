pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod errors;
pub mod extract;
pub mod index;
pub mod logging;
pub mod matching;
pub mod models;

use std::sync::Arc;

pub use config::AppConfig;
pub use errors::*;

use crate::corpus::CorpusSnapshot;
use crate::corpus::CorpusStore;
use crate::embeddings::EmbeddingService;
use crate::extract::ExtractorConfig;
use crate::index::IndexHolder;
use crate::matching::RankProfile;
use crate::matching::RankedMatches;
use crate::matching::Ranker;

/// High-level entry point: resume text in, ranked careers out.
///
/// Wraps the corpus snapshot, the index holder and the ranker behind one
/// handle for embedding into other programs. The HTTP server and the CLI
/// wire the same pieces themselves.
pub struct CareerMatcher {
    snapshot: Arc<CorpusSnapshot>,
    ranker: Ranker,
    extractor: ExtractorConfig,
}

impl CareerMatcher {
    /// Load the corpus and index from configuration. The embedding backend
    /// is probed once; when unreachable the matcher serves fallback ranking.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store = CorpusStore::from_config(config).await?;
        let snapshot = Arc::new(store.load_snapshot().await?);
        let index = Arc::new(IndexHolder::from_artifact(&config.index.artifact_path));
        let embeddings = EmbeddingService::new(config).ok().map(Arc::new);
        Ok(Self::new(snapshot, index, embeddings))
    }

    pub fn new(
        snapshot: Arc<CorpusSnapshot>,
        index: Arc<IndexHolder>,
        embeddings: Option<Arc<EmbeddingService>>,
    ) -> Self {
        Self {
            snapshot: snapshot.clone(),
            ranker: Ranker::new(snapshot, index, embeddings),
            extractor: ExtractorConfig::default(),
        }
    }

    pub fn snapshot(&self) -> &CorpusSnapshot {
        &self.snapshot
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Parse a resume and rank careers against it.
    pub async fn match_resume(&self, resume_text: &str, top_n: usize) -> RankedMatches {
        let resume = extract::parse_resume_text(resume_text, &self.extractor);
        let profile = RankProfile {
            query_text: resume.query_text(),
            skills: resume.skills,
            interests: extract::extract_interests(resume_text, &self.extractor),
        };
        self.ranker.rank(&profile, top_n).await
    }

    /// Rank careers for an explicit skill list.
    pub fn match_skills<I, S>(&self, skills: I, top_n: usize) -> RankedMatches
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let profile = RankProfile {
            skills: skills
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            ..RankProfile::default()
        };
        self.ranker.rank_fallback_only(&profile, top_n)
    }
}
