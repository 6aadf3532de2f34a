//! Error types for SLR

use thiserror::Error;

/// Main error type for SLR
#[derive(Error, Debug)]
pub enum SlrError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Reward error: {0}")]
    Reward(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SLR operations
pub type Result<T> = std::result::Result<T, SlrError>;
