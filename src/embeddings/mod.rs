//! Embedding collaborator client.
//!
//! The engine treats embedding generation as an external model collaborator:
//! text in, fixed-length float vector out. Providers:
//! - `OpenAI` (text-embedding-3-small etc.)
//! - Ollama (local models such as all-minilm)
//!
//! Vectors are L2-normalized by [`EmbeddingService`] so inner product equals
//! cosine similarity downstream.

pub mod client;
pub mod generator;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::l2_normalize;
pub use generator::EmbeddingService;

/// Maximum number of texts per batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        // Provider detection: explicit "ollama" key, otherwise by endpoint
        let embeddings = &config.embeddings;
        let provider = if embeddings.api_key == "ollama" {
            EmbeddingProvider::Ollama
        } else if embeddings.endpoint.contains("api.openai.com") {
            EmbeddingProvider::OpenAI
        } else if embeddings.endpoint.contains("localhost")
            || !embeddings.endpoint.contains("openai")
        {
            // Local or non-OpenAI endpoint, assume Ollama
            EmbeddingProvider::Ollama
        } else {
            EmbeddingProvider::OpenAI
        };

        Self {
            provider,
            model: embeddings.model.clone(),
            dimension: embeddings.dimension,
            endpoint: embeddings.endpoint.clone(),
            api_key: if provider == EmbeddingProvider::OpenAI {
                Some(embeddings.api_key.clone())
            } else {
                None
            },
        }
    }
}
