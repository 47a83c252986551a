use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_embedding_dimension() -> usize {
    384
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Path of the persisted index artifact. Absent file means first run:
    /// the engine serves fallback matches until `index build` has been run.
    #[serde(default = "default_index_path")]
    pub artifact_path: String,
    #[serde(default = "default_build_batch_size")]
    pub build_batch_size: usize,
}

fn default_index_path() -> String {
    "career_index.json".to_string()
}

fn default_build_batch_size() -> usize {
    64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_enable_cors() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_index_path(),
            build_batch_size: default_build_batch_size(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default config file path
    pub fn load() -> crate::Result<Self> {
        // Try config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::CareerPathError::Config(
                "No config.toml or config.example.toml found".to_string(),
            ))
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml_str = r#"
            [database]
            url = "sqlite://career_skills.db"

            [logging]
            level = "info"

            [embeddings]
            endpoint = "http://localhost:11434"
            api_key = "ollama"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.url, "sqlite://career_skills.db");
        assert_eq!(config.embeddings.model, "all-minilm");
        assert_eq!(config.embeddings.dimension, 384);
        assert_eq!(config.index.artifact_path, "career_index.json");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.enable_cors);
    }

    #[test]
    fn test_parse_overridden_index_config() {
        let toml_str = r#"
            [database]
            url = "sqlite://test.db"

            [logging]
            level = "debug"

            [embeddings]
            endpoint = "https://api.openai.com"
            api_key = "sk-test"
            model = "text-embedding-3-small"
            dimension = 1536

            [index]
            artifact_path = "/tmp/idx.json"
            build_batch_size = 16
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.embedding_dimension(), 1536);
        assert_eq!(config.index.artifact_path, "/tmp/idx.json");
        assert_eq!(config.index.build_batch_size, 16);
    }
}
