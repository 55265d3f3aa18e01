//! # Predict Errors

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for predict calls
pub type PyfuncResult<T> = Result<T, PyfuncError>;

/// Predict call errors
#[derive(Debug, Clone, Error)]
pub enum PyfuncError {
    /// Model input rejected before the predict logic ran
    #[error("{0}")]
    InvalidInput(#[from] SchemaError),

    /// Raised by the predict logic itself
    #[error("Predict failed: {0}")]
    Predict(String),
}

impl PyfuncError {
    /// Create an error from inside predict logic
    pub fn predict(message: impl Into<String>) -> Self {
        PyfuncError::Predict(message.into())
    }

    /// Human-readable message without code prefix
    pub fn message(&self) -> String {
        match self {
            PyfuncError::InvalidInput(err) => err.message().to_string(),
            PyfuncError::Predict(message) => message.clone(),
        }
    }

    /// The validation error, if the input was rejected
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            PyfuncError::InvalidInput(err) => Some(err),
            PyfuncError::Predict(_) => None,
        }
    }
}
