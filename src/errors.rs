//! Error types for EduBot
//!
//! One crate-wide error enum. Per-document corpus failures are recovered
//! inside the index; everything else propagates to the caller.

use thiserror::Error;

/// Main error type for the tutoring backend
#[derive(Error, Debug)]
pub enum EduBotError {
    /// The embedding backend failed or returned malformed output
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A single document could not be read
    #[error("Failed to read document '{source_id}': {reason}")]
    CorpusRead { source_id: String, reason: String },

    /// The document folder itself could not be listed
    #[error("Document source unavailable at {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// Language model API errors
    #[error("Model API error: {0}")]
    ModelApi(String),

    /// Web search errors
    #[error("Web search error: {0}")]
    Search(String),

    /// Image payload could not be normalised to base64
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Malformed request from a caller
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for EduBot operations
pub type Result<T> = std::result::Result<T, EduBotError>;

/// Convert anyhow errors to EduBotError
impl From<anyhow::Error> for EduBotError {
    fn from(err: anyhow::Error) -> Self {
        EduBotError::Generic(format!("{:#}", err))
    }
}

impl From<candle_core::Error> for EduBotError {
    fn from(err: candle_core::Error) -> Self {
        EduBotError::Embedding(err.to_string())
    }
}
