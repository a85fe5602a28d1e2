//! Error types for localaid.
//!
//! This module defines a unified error enum that covers every error category
//! in the workspace: configuration, I/O, ingestion, directory loading, prompt
//! rendering, generation, and the request-level input and availability errors.

use thiserror::Error;

/// Unified error type for localaid.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Errors are represented and propagated, never panicked on.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Ingestion step errors (missing input, unwritable output)
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Directory loading errors
    #[error("Directory error: {0}")]
    Directory(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// External generative service failures
    #[error("Generation error: {0}")]
    Generation(String),

    /// Caller supplied missing or blank input
    #[error("{0}")]
    Input(String),

    /// No directory data is loaded
    #[error("{0}")]
    DataUnavailable(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Whether this error reports an unknown or unavailable model.
    ///
    /// Matches "not found" or "404" anywhere in the message, case-insensitive.
    pub fn is_model_not_found(&self) -> bool {
        let message = self.to_string().to_lowercase();
        message.contains("not found") || message.contains("404")
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Csv(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
