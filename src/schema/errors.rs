//! Schema error types
//!
//! Error codes:
//! - HINTSIG_INVALID_INPUT (REJECT)
//! - HINTSIG_UNSUPPORTED_TYPE_HINT (WARN)
//! - HINTSIG_SIGNATURE_INFERENCE_FAILED (WARN)
//!
//! Only invalid input stops a call. The other codes are reported as
//! warnings by the callers that receive them.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The call is rejected before the predict logic runs
    Reject,
    /// Downgraded to a logged warning
    Warn,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Warn => write!(f, "WARN"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Value does not match the declared hint
    InvalidInput,
    /// Hint has no schema mapping
    UnsupportedTypeHint,
    /// No schema could be derived from an example
    InferenceFailed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidInput => "HINTSIG_INVALID_INPUT",
            SchemaErrorCode::UnsupportedTypeHint => "HINTSIG_UNSUPPORTED_TYPE_HINT",
            SchemaErrorCode::InferenceFailed => "HINTSIG_SIGNATURE_INFERENCE_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::InvalidInput => Severity::Reject,
            _ => Severity::Warn,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "messages[0].role"); empty for the top-level value
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: "field to be present".into(),
            actual: "missing".into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }

    fn is_missing(&self) -> bool {
        self.actual == "missing"
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing() {
            return write!(f, "Missing required field `{}`", self.field);
        }
        if !self.field.is_empty() {
            write!(f, "Invalid value for `{}`: ", self.field)?;
        }
        write!(f, "Expected {}, but got {}", self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Offending hint, rendered, if applicable
    hint: Option<String>,
    /// Validation details if applicable
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create an invalid input error
    pub fn invalid_input(details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::InvalidInput,
            message: details.to_string(),
            hint: None,
            details: Some(details),
        }
    }

    /// Create an unsupported hint error
    pub fn unsupported_hint(hint: impl Into<String>, reason: impl Into<String>) -> Self {
        let hint = hint.into();
        Self {
            code: SchemaErrorCode::UnsupportedTypeHint,
            message: format!("Unsupported type hint `{}`: {}", hint, reason.into()),
            hint: Some(hint),
            details: None,
        }
    }

    /// Create an inference failure
    pub fn inference_failed(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::InferenceFailed,
            message: reason.into(),
            hint: None,
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending hint, if applicable
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Returns whether this error rejects the call
    pub fn is_reject(&self) -> bool {
        self.severity() == Severity::Reject
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::InvalidInput.code(), "HINTSIG_INVALID_INPUT");
        assert_eq!(SchemaErrorCode::UnsupportedTypeHint.code(), "HINTSIG_UNSUPPORTED_TYPE_HINT");
        assert_eq!(SchemaErrorCode::InferenceFailed.code(), "HINTSIG_SIGNATURE_INFERENCE_FAILED");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::InvalidInput.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::UnsupportedTypeHint.severity(), Severity::Warn);
    }

    #[test]
    fn test_top_level_mismatch_message() {
        let err = SchemaError::invalid_input(ValidationDetails::type_mismatch("", "list", "str"));
        assert_eq!(err.message(), "Expected list, but got str");
        assert!(err.is_reject());
        assert!(err.to_string().contains("HINTSIG_INVALID_INPUT"));
    }

    #[test]
    fn test_nested_and_missing_messages() {
        let nested = ValidationDetails::type_mismatch("messages[0].role", "str", "int");
        assert_eq!(
            nested.to_string(),
            "Invalid value for `messages[0].role`: Expected str, but got int"
        );

        let missing = ValidationDetails::missing_field("[0].content");
        assert_eq!(missing.to_string(), "Missing required field `[0].content`");
    }

    #[test]
    fn test_unsupported_hint_keeps_hint() {
        let err = SchemaError::unsupported_hint("list[object]", "`object` has no schema mapping");
        assert_eq!(err.hint(), Some("list[object]"));
        assert!(err.message().starts_with("Unsupported type hint `list[object]`"));
        assert!(!err.is_reject());
    }
}
