//! Embedding API clients for the supported providers

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::CareerPathError;
use crate::errors::Result;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// `OpenAI` embeddings API
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

/// Client for generating embeddings from the configured provider
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Serialize)]
struct OpenAiEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| CareerPathError::Http(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint,
            api_key,
            client,
        })
    }

    /// Generate an embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            EmbeddingProvider::OpenAI => {
                let mut vectors = self.generate_openai(&[text.to_string()]).await?;
                vectors
                    .pop()
                    .ok_or_else(|| CareerPathError::Embedding("empty response".to_string()))
            }
            EmbeddingProvider::Ollama => self.generate_ollama(text).await,
        }
    }

    /// Generate embeddings for multiple texts
    pub async fn generate_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self.provider {
            EmbeddingProvider::OpenAI => self.generate_openai(texts).await,
            EmbeddingProvider::Ollama => {
                // Ollama's embeddings endpoint is single-text; loop
                let mut vectors = Vec::with_capacity(texts.len());
                for text in texts {
                    vectors.push(self.generate_ollama(text).await?);
                }
                Ok(vectors)
            }
        }
    }

    async fn generate_openai(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!("Generating {} OpenAI embeddings", texts.len());

        let url = format!("{}/v1/embeddings", self.endpoint.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&OpenAiEmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CareerPathError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CareerPathError::Embedding(format!(
                "OpenAI embeddings request failed: {}",
                response.status()
            )));
        }

        let body: OpenAiEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| CareerPathError::Embedding(e.to_string()))?;
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }

    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Generating Ollama embedding");

        let url = format!("{}/api/embeddings", self.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&OllamaEmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| CareerPathError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CareerPathError::Embedding(format!(
                "Ollama embeddings request failed: {}",
                response.status()
            )));
        }

        let body: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| CareerPathError::Embedding(e.to_string()))?;
        Ok(body.embedding)
    }
}
