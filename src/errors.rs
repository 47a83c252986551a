use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerPathError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Career not found: {0}")]
    CareerNotFound(String),

    #[error("Vector index unavailable")]
    IndexUnavailable,

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, CareerPathError>;
