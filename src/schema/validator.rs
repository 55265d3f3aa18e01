//! Runtime validation and coercion against declared type hints
//!
//! Validation semantics:
//! - list hints require a list; a DataFrame is first converted to a list
//!   (single column: that column's values, otherwise one mapping per row)
//! - dict hints require a mapping; a DataFrame is checked row by row
//! - record hints accept an instance of the same record as-is, or rebuild
//!   one from a mapping: required fields must be present, present fields are
//!   coerced recursively, absent optional fields take their default and
//!   undeclared keys are dropped; a DataFrame yields one record per row
//! - Optional[T] accepts None; other unions need one matching member
//! - scalars must match exactly, except that an int is widened for a float
//!
//! The caller's value is never mutated; coercion returns a new value.

use crate::hints::{RecordDef, ScalarKind, TypeHint};
use crate::value::{Frame, Record, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::Schema;

/// Outcome of visiting one value against one hint.
enum Coercion {
    /// The value already satisfies the hint
    PassThrough,
    /// A new value was built (record rebuilt, number widened, ...)
    Rebuilt(Value),
}

impl Coercion {
    fn into_value(self, original: &Value) -> Value {
        match self {
            Coercion::PassThrough => original.clone(),
            Coercion::Rebuilt(value) => value,
        }
    }
}

/// Validates `value` against `hint` and returns the coerced value.
///
/// # Errors
///
/// Returns `HINTSIG_INVALID_INPUT` describing the first mismatch found, e.g.
/// "Expected list, but got str".
pub fn coerce_and_validate(hint: &TypeHint, value: &Value) -> SchemaResult<Value> {
    Ok(visit(hint, value, "")?.into_value(value))
}

/// Validates `value` against `hint` without producing a coerced copy.
pub fn validate(hint: &TypeHint, value: &Value) -> SchemaResult<()> {
    visit(hint, value, "").map(|_| ())
}

/// Checks a tabular input against the named columns of a schema.
///
/// Only frames and mappings are checked; schemas without named columns
/// accept any value.
pub fn enforce_columns(schema: &Schema, value: &Value) -> SchemaResult<()> {
    let present: Vec<&str> = match value {
        Value::Frame(frame) => frame.columns.iter().map(String::as_str).collect(),
        Value::Map(map) => map.keys().map(String::as_str).collect(),
        _ => return Ok(()),
    };

    for column in schema.columns.iter().filter(|c| c.required) {
        if let Some(name) = column.name.as_deref() {
            if !present.contains(&name) {
                return Err(SchemaError::invalid_input(ValidationDetails::missing_field(name)));
            }
        }
    }
    Ok(())
}

fn visit(hint: &TypeHint, value: &Value, path: &str) -> SchemaResult<Coercion> {
    match hint {
        TypeHint::Any | TypeHint::DataFrame | TypeHint::Opaque(_) => Ok(Coercion::PassThrough),
        TypeHint::NoneType => match value {
            Value::Null => Ok(Coercion::PassThrough),
            other => Err(type_error(path, hint, other)),
        },
        TypeHint::Scalar(kind) => visit_scalar(*kind, hint, value, path),
        TypeHint::Union(members) => match hint.as_optional() {
            Some(_) if value.is_null() => Ok(Coercion::PassThrough),
            Some(inner) => visit(inner, value, path),
            None => members
                .iter()
                .find_map(|member| visit(member, value, path).ok())
                .ok_or_else(|| type_error(path, hint, value)),
        },
        TypeHint::List(element) => match value {
            Value::List(items) => visit_items(element, items, path),
            Value::Frame(frame) => {
                let items = frame_to_list(frame);
                let coerced = visit_items(element, &items, path)?;
                Ok(Coercion::Rebuilt(coerced.into_value(&Value::List(items))))
            }
            other => Err(type_error(path, hint, other)),
        },
        TypeHint::Dict { value: value_hint, .. } => match value {
            Value::Map(map) => {
                let mut rebuilt = false;
                let mut out = map.clone();
                for (key, item) in map {
                    if let Coercion::Rebuilt(new) = visit(value_hint, item, &make_path(path, key))? {
                        out.insert(key.clone(), new);
                        rebuilt = true;
                    }
                }
                Ok(if rebuilt {
                    Coercion::Rebuilt(Value::Map(out))
                } else {
                    Coercion::PassThrough
                })
            }
            Value::Frame(frame) => visit_rows(hint, frame, path),
            other => Err(type_error(path, hint, other)),
        },
        TypeHint::Record(def) => match value {
            Value::Record(record) if record.name == def.name => Ok(Coercion::PassThrough),
            Value::Map(map) => {
                let record = build_record(def, map, path)?;
                Ok(Coercion::Rebuilt(Value::Record(record)))
            }
            Value::Frame(frame) => visit_rows(hint, frame, path),
            other => Err(type_error(path, hint, other)),
        },
    }
}

fn visit_scalar(kind: ScalarKind, hint: &TypeHint, value: &Value, path: &str) -> SchemaResult<Coercion> {
    match (kind, value) {
        (ScalarKind::Int, Value::Long(_))
        | (ScalarKind::Str, Value::Str(_))
        | (ScalarKind::Bool, Value::Bool(_))
        | (ScalarKind::Float, Value::Double(_))
        | (ScalarKind::Bytes, Value::Bytes(_))
        | (ScalarKind::Datetime, Value::Datetime(_)) => Ok(Coercion::PassThrough),
        (ScalarKind::Float, Value::Long(n)) => Ok(Coercion::Rebuilt(Value::Double(*n as f64))),
        (_, other) => Err(type_error(path, hint, other)),
    }
}

fn visit_items(element: &TypeHint, items: &[Value], path: &str) -> SchemaResult<Coercion> {
    let mut rebuilt: Option<Vec<Value>> = None;
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}[{}]", path, i);
        match visit(element, item, &item_path)? {
            Coercion::PassThrough => {
                if let Some(out) = rebuilt.as_mut() {
                    out.push(item.clone());
                }
            }
            Coercion::Rebuilt(new) => {
                let out = rebuilt.get_or_insert_with(|| items[..i].to_vec());
                out.push(new);
            }
        }
    }
    Ok(match rebuilt {
        Some(out) => Coercion::Rebuilt(Value::List(out)),
        None => Coercion::PassThrough,
    })
}

fn build_record(
    def: &RecordDef,
    map: &std::collections::BTreeMap<String, Value>,
    path: &str,
) -> SchemaResult<Record> {
    let mut record = Record::new(def.name.clone());
    for field in &def.fields {
        let field_path = make_path(path, &field.name);
        let value = match (map.get(&field.name), &field.default) {
            (Some(given), _) => visit(&field.hint, given, &field_path)?.into_value(given),
            (None, Some(default)) => default.clone(),
            (None, None) => {
                return Err(SchemaError::invalid_input(ValidationDetails::missing_field(
                    field_path,
                )))
            }
        };
        record.fields.push((field.name.clone(), value));
    }
    Ok(record)
}

/// Coerces every row mapping of a frame against a mapping-shaped hint.
fn visit_rows(hint: &TypeHint, frame: &Frame, path: &str) -> SchemaResult<Coercion> {
    let rows = frame
        .row_maps()
        .into_iter()
        .enumerate()
        .map(|(i, row)| -> SchemaResult<Value> {
            Ok(visit(hint, &row, &format!("{}[{}]", path, i))?.into_value(&row))
        })
        .collect::<SchemaResult<Vec<_>>>()?;
    Ok(Coercion::Rebuilt(Value::List(rows)))
}

/// Rows of a frame as list items: the lone column's cells, or row mappings.
fn frame_to_list(frame: &Frame) -> Vec<Value> {
    if frame.columns.len() == 1 {
        frame.column(0)
    } else {
        frame.row_maps()
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Creates a type mismatch error.
fn type_error(path: &str, expected: &TypeHint, actual: &Value) -> SchemaError {
    SchemaError::invalid_input(ValidationDetails::type_mismatch(
        path,
        expected.kind_name(),
        actual.type_name(),
    ))
}
