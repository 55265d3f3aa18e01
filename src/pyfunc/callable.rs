//! # Typed Callables
//!
//! A predict function together with the type hints it declares.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::hints::TypeHints;
use crate::value::Value;

use super::errors::PyfuncResult;

/// Inference parameters passed alongside the model input
pub type Params = BTreeMap<String, Value>;

/// Signature of a predict function body
pub type PredictFn = dyn Fn(Value, Option<&Params>) -> PyfuncResult<Value> + Send + Sync;

/// A plain predict function with declared hints.
///
/// Calling it directly performs no validation; wrap it with
/// [`pyfunc`](super::pyfunc) for that.
#[derive(Clone)]
pub struct TypedCallable {
    name: String,
    hints: TypeHints,
    func: Arc<PredictFn>,
}

impl TypedCallable {
    /// Create a typed callable
    pub fn new<F>(name: impl Into<String>, hints: TypeHints, func: F) -> Self
    where
        F: Fn(Value, Option<&Params>) -> PyfuncResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            hints,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hints(&self) -> &TypeHints {
        &self.hints
    }

    /// Invokes the function as-is.
    pub fn call(&self, input: Value, params: Option<&Params>) -> PyfuncResult<Value> {
        (self.func)(input, params)
    }
}

impl fmt::Debug for TypedCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCallable")
            .field("name", &self.name)
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::TypeHint;

    #[test]
    fn test_call_is_unvalidated() {
        let identity = TypedCallable::new(
            "predict",
            TypeHints::same(TypeHint::list(TypeHint::str())),
            |input, _| Ok(input),
        );

        assert_eq!(identity.call(Value::from("a"), None).unwrap(), Value::from("a"));
        assert_eq!(identity.name(), "predict");
    }

    #[test]
    fn test_params_reach_function() {
        let echo = TypedCallable::new("echo", TypeHints::none(), |_, params| {
            Ok(params
                .and_then(|p| p.get("k").cloned())
                .unwrap_or(Value::Null))
        });

        let params = Params::from([("k".to_string(), Value::Long(3))]);
        assert_eq!(echo.call(Value::Null, Some(&params)).unwrap(), Value::Long(3));
    }
}
