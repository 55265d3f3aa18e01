//! Schema type definitions
//!
//! Supported column types:
//! - long, string, boolean, double, binary, datetime
//! - array: homogeneous array with element type
//! - map: string keys, homogeneous values
//! - object: ordered properties, each required or optional
//! - any: unconstrained

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer
    Long,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// 64-bit floating point
    Double,
    /// Raw bytes
    Binary,
    /// Timestamp
    Datetime,
}

impl DataType {
    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Long => "long",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Double => "double",
            DataType::Binary => "binary",
            DataType::Datetime => "datetime",
        }
    }
}

/// Column (or property) type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColType {
    Long,
    String,
    Boolean,
    Double,
    Binary,
    Datetime,
    /// Homogeneous array
    Array {
        /// Element type (boxed to allow recursive types)
        items: Box<ColType>,
    },
    /// String-keyed map
    Map {
        /// Value type
        values: Box<ColType>,
    },
    /// Structured object with ordered properties
    Object {
        properties: Vec<Property>,
    },
    /// Unconstrained
    Any,
}

impl ColType {
    pub fn array(items: impl Into<ColType>) -> Self {
        ColType::Array {
            items: Box::new(items.into()),
        }
    }

    pub fn map(values: impl Into<ColType>) -> Self {
        ColType::Map {
            values: Box::new(values.into()),
        }
    }

    pub fn object(properties: Vec<Property>) -> Self {
        ColType::Object { properties }
    }

    /// Returns the scalar data type, if this is a scalar column.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            ColType::Long => Some(DataType::Long),
            ColType::String => Some(DataType::String),
            ColType::Boolean => Some(DataType::Boolean),
            ColType::Double => Some(DataType::Double),
            ColType::Binary => Some(DataType::Binary),
            ColType::Datetime => Some(DataType::Datetime),
            _ => None,
        }
    }

    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColType::Array { .. } => "array",
            ColType::Map { .. } => "map",
            ColType::Object { .. } => "object",
            ColType::Any => "any",
            scalar => scalar.data_type().map(|d| d.type_name()).unwrap_or("any"),
        }
    }
}

impl From<DataType> for ColType {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Long => ColType::Long,
            DataType::String => ColType::String,
            DataType::Boolean => ColType::Boolean,
            DataType::Double => ColType::Double,
            DataType::Binary => ColType::Binary,
            DataType::Datetime => ColType::Datetime,
        }
    }
}

impl fmt::Display for ColType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColType::Array { items } => write!(f, "Array({})", items),
            ColType::Map { values } => write!(f, "Map({})", values),
            ColType::Object { properties } => {
                write!(f, "Object(")?;
                for (i, p) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p.name)?;
                    if !p.required {
                        write!(f, "?")?;
                    }
                    write!(f, ": {}", p.dtype)?;
                }
                write!(f, ")")
            }
            other => write!(f, "{}", other.type_name()),
        }
    }
}

/// Named property of an object column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Property type
    #[serde(flatten)]
    pub dtype: ColType,
    /// Whether the property must be present
    pub required: bool,
}

impl Property {
    /// Create a required property
    pub fn new(name: impl Into<String>, dtype: impl Into<ColType>) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
            required: true,
        }
    }

    /// Create an optional property
    pub fn optional(name: impl Into<String>, dtype: impl Into<ColType>) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
            required: false,
        }
    }
}

/// Column specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColSpec {
    /// Column name; hint-derived columns are unnamed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Column type
    #[serde(flatten)]
    pub col_type: ColType,
    /// Whether the column must be present
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ColSpec {
    /// Create a required unnamed column
    pub fn new(col_type: impl Into<ColType>) -> Self {
        Self {
            name: None,
            col_type: col_type.into(),
            required: true,
        }
    }

    /// Create a required named column
    pub fn named(name: impl Into<String>, col_type: impl Into<ColType>) -> Self {
        Self {
            name: Some(name.into()),
            col_type: col_type.into(),
            required: true,
        }
    }

    /// Marks the column optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Ordered sequence of column specifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Columns in order
    pub columns: Vec<ColSpec>,
}

impl Schema {
    pub fn new(columns: Vec<ColSpec>) -> Self {
        Self { columns }
    }

    /// A single unnamed column of the given type
    pub fn single(col_type: impl Into<ColType>) -> Self {
        Self::new(vec![ColSpec::new(col_type)])
    }

    /// The schema used when an output cannot be described: one Any column
    pub fn any() -> Self {
        Self::single(ColType::Any)
    }

    /// Column names, for named (tabular) schemas
    pub fn column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| c.name.as_deref())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Input and output schemas attached to a saved model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSignature {
    /// Input schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Schema>,
    /// Output schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Schema>,
    /// Whether the signature was derived from type hints
    #[serde(default)]
    pub from_type_hint: bool,
}

impl ModelSignature {
    pub fn new(inputs: Option<Schema>, outputs: Option<Schema>) -> Self {
        Self {
            inputs,
            outputs,
            from_type_hint: false,
        }
    }

    /// Signature derived from type hints
    pub fn from_type_hints(inputs: Schema, outputs: Schema) -> Self {
        Self {
            inputs: Some(inputs),
            outputs: Some(outputs),
            from_type_hint: true,
        }
    }
}
