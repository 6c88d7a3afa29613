//! Agente error types

use thiserror::Error;

/// Agente error type
#[derive(Error, Debug)]
pub enum Error {
    /// Fetching articles from the remote store failed
    #[error("Network error: {0}")]
    Network(String),

    /// Writing a saved flag to the remote store failed
    #[error("Mutation error: {0}")]
    Mutation(String),

    /// The article is not present in the local store
    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for read-side failures that leave the store untouched
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// True for write-side failures that trigger a rollback
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation(_))
    }
}

/// Result type alias for Agente operations
pub type Result<T> = std::result::Result<T, Error>;
