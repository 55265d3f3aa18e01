//! Runtime values passed to and returned from predict functions.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A runtime value: scalar, container, record instance or tabular batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    Null,
    Bool(bool),
    Long(i64),
    Double(#[serde(with = "json_double")] f64),
    Str(String),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    Datetime(DateTime<Utc>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Record(Record),
    Frame(Frame),
}

impl Value {
    /// Kind name used in validation messages ("list", "str", ...).
    ///
    /// Record instances report their record name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "NoneType",
            Value::Bool(_) => "bool",
            Value::Long(_) => "int",
            Value::Double(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Datetime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "dict",
            Value::Record(record) => &record.name,
            Value::Frame(_) => "DataFrame",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Converts record instances (recursively) into mappings.
    ///
    /// Two values are considered equivalent across a save/load cycle when
    /// their normalized forms are equal.
    pub fn normalized(&self) -> Value {
        match self {
            Value::Record(record) => record.to_map(),
            Value::List(items) => Value::List(items.iter().map(Value::normalized).collect()),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.normalized()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Datetime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}': {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Record(record) => {
                write!(f, "{}(", record.name)?;
                for (i, (k, v)) in record.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, ")")
            }
            Value::Frame(frame) => write!(
                f,
                "DataFrame({} columns, {} rows)",
                frame.columns.len(),
                frame.rows.len()
            ),
        }
    }
}

/// An instance of a structured record type.
///
/// Fields keep the declaration order of the record definition that built it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record type name
    pub name: String,
    /// Field values in declaration order
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field append.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Looks up a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Mapping form of the record; nested records are converted too.
    pub fn to_map(&self) -> Value {
        Value::Map(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.normalized()))
                .collect(),
        )
    }
}

/// A tabular batch of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Column names
    pub columns: Vec<String>,
    /// Row values, one entry per column
    pub rows: Vec<Vec<Value>>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a frame from named columns of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> Self {
        let height = columns.iter().map(|(_, c)| c.len()).max().unwrap_or(0);
        let names = columns.iter().map(|(n, _)| n.clone()).collect();
        let rows = (0..height)
            .map(|i| {
                columns
                    .iter()
                    .map(|(_, c)| c.get(i).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self {
            columns: names,
            rows,
        }
    }

    /// Appends a row; missing trailing cells are filled with nulls.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// Values of the column at `index`, top to bottom.
    pub fn column(&self, index: usize) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Each row as a mapping from column name to cell.
    pub fn row_maps(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                Value::Map(
                    self.columns
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned())
                        .collect(),
                )
            })
            .collect()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// JSON has no NaN or infinity; those are written as strings.
mod json_double {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(serde::de::Error::custom(format!("invalid double `{}`", other))),
            },
        }
    }
}
