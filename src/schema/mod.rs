//! Schema subsystem for hintsig
//!
//! Turns declared type hints (or, failing that, an input example) into a
//! column schema, and validates runtime values against the hints.
//!
//! # Design Principles
//!
//! - One schema per model, derived once when the model is saved
//! - Input mismatches reject the call before the predict logic runs
//! - Coercion never mutates the caller's value
//! - Unions collapse to Any; Optional[T] marks its column not required

mod errors;
mod infer;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use infer::{check_hint, schema_from_example, schema_from_hint};
pub use types::{ColSpec, ColType, DataType, ModelSignature, Property, Schema};
pub use validator::{coerce_and_validate, enforce_columns, validate};
