//! Schema inference
//!
//! Two sources:
//! - declared type hints ([`schema_from_hint`])
//! - a concrete input example ([`schema_from_example`]), used when the
//!   hint is absent, tabular or unsupported
//!
//! Hint mapping:
//! - scalars map to their data type
//! - `list[T]` -> Array(T), `dict[str, T]` -> Map(T)
//! - `Optional[T]` -> T, marked not required
//! - any other union collapses to Any
//! - records -> Object, properties in declaration order; defaulted
//!   fields are not required

use crate::hints::{RecordDef, ScalarKind, TypeHint};
use crate::value::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColSpec, ColType, DataType, Property, Schema};

/// Derives the schema described by a type hint.
///
/// # Errors
///
/// Returns `HINTSIG_UNSUPPORTED_TYPE_HINT` naming the full hint when any part
/// of it has no schema mapping.
pub fn schema_from_hint(hint: &TypeHint) -> SchemaResult<Schema> {
    match hint.as_optional() {
        Some(inner) => {
            let col_type = col_type_from_hint(inner, hint)?;
            Ok(Schema::new(vec![ColSpec::new(col_type).optional()]))
        }
        None => Ok(Schema::single(col_type_from_hint(hint, hint)?)),
    }
}

/// Checks that a hint is fully supported without building the schema.
pub fn check_hint(hint: &TypeHint) -> SchemaResult<()> {
    schema_from_hint(hint).map(|_| ())
}

fn scalar_data_type(kind: ScalarKind) -> DataType {
    match kind {
        ScalarKind::Int => DataType::Long,
        ScalarKind::Str => DataType::String,
        ScalarKind::Bool => DataType::Boolean,
        ScalarKind::Float => DataType::Double,
        ScalarKind::Bytes => DataType::Binary,
        ScalarKind::Datetime => DataType::Datetime,
    }
}

fn col_type_from_hint(hint: &TypeHint, root: &TypeHint) -> SchemaResult<ColType> {
    match hint {
        TypeHint::Scalar(kind) => Ok(scalar_data_type(*kind).into()),
        TypeHint::Any => Ok(ColType::Any),
        TypeHint::List(element) => Ok(ColType::array(col_type_from_hint(element, root)?)),
        TypeHint::Dict { key, value } => {
            if **key != TypeHint::str() {
                return Err(SchemaError::unsupported_hint(
                    root.to_string(),
                    format!("dictionary keys must be `str`, got `{}`", key),
                ));
            }
            Ok(ColType::map(col_type_from_hint(value, root)?))
        }
        TypeHint::Union(_) => match hint.as_optional() {
            Some(inner) => col_type_from_hint(inner, root),
            None => Ok(ColType::Any),
        },
        TypeHint::Record(def) => object_from_record(def, root),
        TypeHint::NoneType => Err(SchemaError::unsupported_hint(
            root.to_string(),
            "`None` is only supported inside Optional[...]",
        )),
        TypeHint::DataFrame => Err(SchemaError::unsupported_hint(
            root.to_string(),
            "tabular hints carry no schema, it is inferred from the input example",
        )),
        TypeHint::Opaque(name) => Err(SchemaError::unsupported_hint(
            root.to_string(),
            format!("`{}` has no schema mapping", name),
        )),
    }
}

fn object_from_record(def: &RecordDef, root: &TypeHint) -> SchemaResult<ColType> {
    let properties = def
        .fields
        .iter()
        .map(|field| -> SchemaResult<Property> {
            let declared = field.hint.as_optional().unwrap_or(&field.hint);
            Ok(Property {
                name: field.name.clone(),
                dtype: col_type_from_hint(declared, root)?,
                required: field.is_required(),
            })
        })
        .collect::<SchemaResult<Vec<_>>>()?;
    Ok(ColType::object(properties))
}

/// Derives a schema from a concrete example value.
///
/// Frames produce one named column per frame column; every other value
/// produces a single unnamed column.
///
/// # Errors
///
/// Returns `HINTSIG_SIGNATURE_INFERENCE_FAILED` for empty frames, empty
/// containers and `None`.
pub fn schema_from_example(example: &Value) -> SchemaResult<Schema> {
    match example {
        Value::Frame(frame) => {
            if frame.columns.is_empty() {
                return Err(SchemaError::inference_failed(
                    "Cannot infer a schema from a DataFrame without columns",
                ));
            }
            let columns = frame
                .columns
                .iter()
                .enumerate()
                .map(|(i, name)| -> SchemaResult<ColSpec> {
                    let cells = frame.column(i);
                    match cells.iter().find(|v| !v.is_null()) {
                        Some(value) => Ok(ColSpec::named(name.clone(), value_col_type(value)?)),
                        None => Ok(ColSpec::named(name.clone(), ColType::Any).optional()),
                    }
                })
                .collect::<SchemaResult<Vec<_>>>()?;
            Ok(Schema::new(columns))
        }
        Value::Null => Err(SchemaError::inference_failed(
            "Cannot infer a schema from a None input example",
        )),
        other => Ok(Schema::single(value_col_type(other)?)),
    }
}

fn value_col_type(value: &Value) -> SchemaResult<ColType> {
    match value {
        Value::Null | Value::Frame(_) => Ok(ColType::Any),
        Value::Bool(_) => Ok(ColType::Boolean),
        Value::Long(_) => Ok(ColType::Long),
        Value::Double(_) => Ok(ColType::Double),
        Value::Str(_) => Ok(ColType::String),
        Value::Bytes(_) => Ok(ColType::Binary),
        Value::Datetime(_) => Ok(ColType::Datetime),
        Value::List(items) => {
            if items.is_empty() {
                return Err(SchemaError::inference_failed(
                    "Cannot infer the element type of an empty list",
                ));
            }
            Ok(ColType::array(unify(items.iter())?))
        }
        Value::Map(map) => {
            if map.is_empty() {
                return Err(SchemaError::inference_failed(
                    "Cannot infer the value type of an empty dict",
                ));
            }
            Ok(ColType::map(unify(map.values())?))
        }
        Value::Record(record) => {
            let properties = record
                .fields
                .iter()
                .map(|(name, v)| -> SchemaResult<Property> {
                    Ok(Property {
                        name: name.clone(),
                        dtype: value_col_type(v)?,
                        required: !v.is_null(),
                    })
                })
                .collect::<SchemaResult<Vec<_>>>()?;
            Ok(ColType::object(properties))
        }
    }
}

/// Common type of non-null values, or Any when they disagree.
fn unify<'a>(values: impl Iterator<Item = &'a Value>) -> SchemaResult<ColType> {
    let mut common: Option<ColType> = None;
    for value in values.filter(|v| !v.is_null()) {
        let col_type = value_col_type(value)?;
        match &common {
            None => common = Some(col_type),
            Some(existing) if *existing == col_type => {}
            Some(_) => return Ok(ColType::Any),
        }
    }
    Ok(common.unwrap_or(ColType::Any))
}
