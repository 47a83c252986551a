//! Vector similarity index over the career corpus.
//!
//! A flat inner-product index over L2-normalized embeddings: with unit
//! vectors the inner product is the cosine similarity, bounded in [-1, 1].
//! An index is immutable after build; refreshing the corpus means building a
//! new index and swapping it into the [`IndexHolder`], so in-flight queries
//! always complete against the snapshot they started with.

pub mod holder;

pub use holder::IndexHolder;

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::corpus::CorpusSnapshot;
use crate::embeddings::EmbeddingService;
use crate::errors::CareerPathError;
use crate::errors::Result;

/// One nearest-neighbor hit: career title and cosine similarity.
pub type IndexHit = (String, f32);

/// Immutable flat index: titles in corpus insertion order with their
/// normalized embedding vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: usize,
    titles: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build an index from a corpus snapshot by embedding each entry's text
    /// surface (title concatenated with its skills). Batch step; potentially
    /// long-running.
    pub async fn build(snapshot: &CorpusSnapshot, embeddings: &EmbeddingService) -> Result<Self> {
        let entries = snapshot.all_entries();
        let texts: Vec<String> = entries.iter().map(|e| e.embedding_text()).collect();
        let titles: Vec<String> = entries.iter().map(|e| e.career_title.clone()).collect();

        info!("Building vector index over {} corpus entries", titles.len());
        let vectors = embeddings.embed_many(&texts).await?;
        Self::from_vectors(titles, vectors)
    }

    /// Assemble an index from precomputed vectors (build and test paths).
    /// Vectors must be L2-normalized and share one dimension.
    pub fn from_vectors(titles: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if titles.len() != vectors.len() {
            return Err(CareerPathError::Custom(format!(
                "title/vector count mismatch: {} vs {}",
                titles.len(),
                vectors.len()
            )));
        }
        let dimension = vectors.first().map_or(0, Vec::len);
        if vectors.iter().any(|v| v.len() != dimension) {
            return Err(CareerPathError::Custom(
                "inconsistent embedding dimensions".to_string(),
            ));
        }
        Ok(Self {
            dimension,
            titles,
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Nearest neighbors of a normalized query vector by inner product,
    /// descending; ties broken by corpus insertion order (stable sort).
    pub fn query_vector(&self, query: &[f32], top_n: usize) -> Vec<IndexHit> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, inner_product(query, v)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);
        scored
            .into_iter()
            .map(|(i, score)| (self.titles[i].clone(), score))
            .collect()
    }

    /// Persist the index artifact as JSON with a dimension/count header.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let artifact = IndexArtifact {
            dimension: self.dimension,
            count: self.titles.len(),
            index: self.clone(),
        };
        let json = serde_json::to_string(&artifact)?;
        std::fs::write(&path, json)?;
        info!(
            "Saved vector index ({} entries, dim {}) to {}",
            artifact.count,
            artifact.dimension,
            path.as_ref().display()
        );
        Ok(())
    }

    /// Load a previously persisted index artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let artifact: IndexArtifact = serde_json::from_str(&content)?;
        if artifact.count != artifact.index.titles.len() {
            return Err(CareerPathError::Custom(
                "index artifact count mismatch".to_string(),
            ));
        }
        Ok(artifact.index)
    }
}

/// Serialized index form with metadata header.
#[derive(Debug, Serialize, Deserialize)]
struct IndexArtifact {
    dimension: usize,
    count: usize,
    index: VectorIndex,
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
