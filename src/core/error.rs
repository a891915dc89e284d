//! Error types for target generation and decomposition

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Canonicalization was requested before a raw grid was set.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Corpus arrays missing, misaligned, malformed, or indexed out of range.
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// Degenerate generator configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// The injected target predictor failed.
    #[error("Predictor error: {0}")]
    Predictor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
