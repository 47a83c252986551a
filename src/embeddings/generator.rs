//! Embedding service with normalization and batching

use std::sync::Arc;

use tracing::info;

use super::client::EmbeddingClient;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::Result;

/// Service wrapping the provider client; every returned vector is
/// L2-normalized so inner product equals cosine similarity.
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service from app configuration
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config))
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Expected vector dimension for the configured model
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Embed a single text, L2-normalized
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = self.client.generate(text).await?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    /// Embed many texts in batches, L2-normalized
    pub async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH_SIZE) {
            let mut batch = self.client.generate_batch(chunk).await?;
            for vector in &mut batch {
                l2_normalize(vector);
            }
            vectors.append(&mut batch);
        }
        info!("Generated {} embeddings", vectors.len());
        Ok(vectors)
    }
}

/// Normalize a vector to unit length in place. Zero vectors stay zero.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}
