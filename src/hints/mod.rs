//! Type hints declared by predict functions
//!
//! Hints are an explicit tagged union ([`TypeHint`]) built either directly in
//! code or from their textual form with [`HintParser`].

mod errors;
mod parser;
mod types;

pub use errors::{HintParseError, HintResult};
pub use parser::HintParser;
pub use types::{FieldSpec, RecordDef, ScalarKind, TypeHint, TypeHints};
