//! Type hint definitions
//!
//! A closed tagged union of the hint shapes a predict function can declare:
//! - scalar: int, str, bool, float, bytes, datetime
//! - list[T], dict[K, V]
//! - Union[...] (Optional[T] is Union[T, None])
//! - Any
//! - structured records with named fields
//! - DataFrame (tabular batches, accepted as-is)
//! - opaque classes with no schema mapping

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Scalar hint kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Str,
    Bool,
    Float,
    Bytes,
    Datetime,
}

impl ScalarKind {
    /// Name as written in a hint
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Str => "str",
            ScalarKind::Bool => "bool",
            ScalarKind::Float => "float",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Datetime => "datetime",
        }
    }
}

/// A declared type hint.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeHint {
    Scalar(ScalarKind),
    /// The `None` type; only meaningful inside a union
    NoneType,
    /// Unconstrained
    Any,
    List(Box<TypeHint>),
    Dict {
        key: Box<TypeHint>,
        value: Box<TypeHint>,
    },
    Union(Vec<TypeHint>),
    Record(Arc<RecordDef>),
    /// Tabular batch; inputs are passed through without validation
    DataFrame,
    /// A class with no schema mapping (e.g. `object`)
    Opaque(String),
}

impl TypeHint {
    pub fn int() -> Self {
        TypeHint::Scalar(ScalarKind::Int)
    }

    pub fn str() -> Self {
        TypeHint::Scalar(ScalarKind::Str)
    }

    pub fn bool() -> Self {
        TypeHint::Scalar(ScalarKind::Bool)
    }

    pub fn float() -> Self {
        TypeHint::Scalar(ScalarKind::Float)
    }

    pub fn bytes() -> Self {
        TypeHint::Scalar(ScalarKind::Bytes)
    }

    pub fn datetime() -> Self {
        TypeHint::Scalar(ScalarKind::Datetime)
    }

    pub fn list(element: TypeHint) -> Self {
        TypeHint::List(Box::new(element))
    }

    /// `dict[str, value]`
    pub fn dict(value: TypeHint) -> Self {
        TypeHint::Dict {
            key: Box::new(TypeHint::str()),
            value: Box::new(value),
        }
    }

    pub fn union(members: Vec<TypeHint>) -> Self {
        TypeHint::Union(members)
    }

    /// `Optional[inner]`, i.e. `Union[inner, None]`
    pub fn optional(inner: TypeHint) -> Self {
        TypeHint::Union(vec![inner, TypeHint::NoneType])
    }

    pub fn record(def: RecordDef) -> Self {
        TypeHint::Record(Arc::new(def))
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        TypeHint::Opaque(name.into())
    }

    /// Returns `T` when this hint is exactly `Optional[T]`.
    pub fn as_optional(&self) -> Option<&TypeHint> {
        match self {
            TypeHint::Union(members) if members.len() == 2 => {
                match (&members[0], &members[1]) {
                    (TypeHint::NoneType, inner) | (inner, TypeHint::NoneType)
                        if *inner != TypeHint::NoneType =>
                    {
                        Some(inner)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// True for hints whose inputs are accepted without validation and
    /// without an unsupported-hint warning.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, TypeHint::DataFrame)
    }

    /// Short kind name used as the "expected" side of validation messages.
    pub fn kind_name(&self) -> String {
        match self {
            TypeHint::Scalar(kind) => kind.name().to_string(),
            TypeHint::NoneType => "NoneType".to_string(),
            TypeHint::Any => "Any".to_string(),
            TypeHint::List(_) => "list".to_string(),
            TypeHint::Dict { .. } => "dict".to_string(),
            TypeHint::Union(_) => self.to_string(),
            TypeHint::Record(def) => def.name.clone(),
            TypeHint::DataFrame => "DataFrame".to_string(),
            TypeHint::Opaque(name) => name.clone(),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Scalar(kind) => write!(f, "{}", kind.name()),
            TypeHint::NoneType => write!(f, "None"),
            TypeHint::Any => write!(f, "Any"),
            TypeHint::List(element) => write!(f, "list[{}]", element),
            TypeHint::Dict { key, value } => write!(f, "dict[{}, {}]", key, value),
            TypeHint::Union(members) => match self.as_optional() {
                Some(inner) => write!(f, "Optional[{}]", inner),
                None => {
                    write!(f, "Union[")?;
                    for (i, member) in members.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", member)?;
                    }
                    write!(f, "]")
                }
            },
            TypeHint::Record(def) => write!(f, "{}", def.name),
            TypeHint::DataFrame => write!(f, "DataFrame"),
            TypeHint::Opaque(name) => write!(f, "{}", name),
        }
    }
}

/// A field of a structured record type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Declared hint
    pub hint: TypeHint,
    /// Default value; a field with a default is optional
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A structured record type: named fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    /// Record type name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a required field.
    pub fn field(mut self, name: impl Into<String>, hint: TypeHint) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            hint,
            default: None,
        });
        self
    }

    /// Adds an optional field with a default value.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        hint: TypeHint,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            hint,
            default: Some(default.into()),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The hints declared by a predict function: first parameter and return type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeHints {
    /// Hint on the model input parameter
    pub input: Option<TypeHint>,
    /// Return type hint
    pub output: Option<TypeHint>,
}

impl TypeHints {
    pub fn new(input: Option<TypeHint>, output: Option<TypeHint>) -> Self {
        Self { input, output }
    }

    /// Same hint for input and output.
    pub fn same(hint: TypeHint) -> Self {
        Self {
            input: Some(hint.clone()),
            output: Some(hint),
        }
    }

    pub fn input_only(hint: TypeHint) -> Self {
        Self {
            input: Some(hint),
            output: None,
        }
    }

    pub fn output_only(hint: TypeHint) -> Self {
        Self {
            input: None,
            output: Some(hint),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

impl fmt::Display for TypeHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |hint: &Option<TypeHint>| {
            hint.as_ref()
                .map(|h| h.to_string())
                .unwrap_or_else(|| "None".to_string())
        };
        write!(
            f,
            "_TypeHints(input={}, output={})",
            render(&self.input),
            render(&self.output)
        )
    }
}
