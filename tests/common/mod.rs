//! Record fixtures shared by the integration tests

#![allow(dead_code)]

use hintsig::hints::{RecordDef, TypeHint};
use hintsig::value::Value;

/// Chat message: two required strings
pub fn message() -> RecordDef {
    RecordDef::new("Message")
        .field("role", TypeHint::str())
        .field("content", TypeHint::str())
}

/// One field per scalar kind, plus Any and a defaulted Optional
pub fn custom_example() -> RecordDef {
    RecordDef::new("CustomExample")
        .field("long_field", TypeHint::int())
        .field("str_field", TypeHint::str())
        .field("bool_field", TypeHint::bool())
        .field("double_field", TypeHint::float())
        .field("binary_field", TypeHint::bytes())
        .field("datetime_field", TypeHint::datetime())
        .field("any_field", TypeHint::Any)
        .field_with_default("optional_str", TypeHint::optional(TypeHint::str()), Value::Null)
}

/// Nested containers and records
pub fn custom_example2() -> RecordDef {
    RecordDef::new("CustomExample2")
        .field("custom_field", TypeHint::dict(TypeHint::Any))
        .field("messages", TypeHint::list(TypeHint::record(message())))
        .field_with_default("optional_int", TypeHint::optional(TypeHint::int()), Value::Null)
}
