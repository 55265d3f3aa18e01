//! # Store Errors

use std::path::Path;

use thiserror::Error;

/// Result type for model store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Model store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid manifest {path}: {message}")]
    Manifest { path: String, message: String },

    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Invalid model URI: {0}")]
    InvalidUri(String),

    #[error("Checksum mismatch for {uri}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        uri: String,
        expected: String,
        actual: String,
    },

    #[error("Predict logic for {0} is not registered in this process")]
    LogicMissing(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn manifest(path: &Path, message: impl Into<String>) -> Self {
        StoreError::Manifest {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// True for errors caused by a model that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::LogicMissing(_))
    }
}
