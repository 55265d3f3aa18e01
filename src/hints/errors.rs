//! # Hint Parse Errors

use thiserror::Error;

/// Result type for textual hint parsing
pub type HintResult<T> = Result<T, HintParseError>;

/// Errors raised while parsing a textual type hint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintParseError {
    #[error("Empty type hint")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Expected {expected} at position {pos}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: usize,
    },

    #[error("`{name}` takes {expected} type argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("Trailing input after type hint at position {0}")]
    TrailingInput(usize),
}
