//! # Validation Decorator
//!
//! [`pyfunc`] wraps a [`TypedCallable`] so every call validates its input
//! against the declared input hint before the body runs.

use std::fmt;

use crate::hints::TypeHints;
use crate::value::Value;

use super::callable::{Params, TypedCallable};
use super::errors::PyfuncResult;
use super::guard::HintGuard;

/// A predict function with runtime input validation
pub struct Pyfunc {
    callable: TypedCallable,
    guard: HintGuard,
}

/// Wraps `callable` with input validation.
///
/// An unsupported input hint is reported here, once; later calls run
/// without validation and without repeating the warning.
pub fn pyfunc(callable: TypedCallable) -> Pyfunc {
    let guard = HintGuard::new(callable.name(), callable.hints());
    guard.warn_unsupported_once();
    Pyfunc { callable, guard }
}

impl Pyfunc {
    /// Validates `input`, then calls the wrapped function.
    pub fn predict(&self, input: impl Into<Value>, params: Option<&Params>) -> PyfuncResult<Value> {
        self.guard
            .invoke(input.into(), |coerced| self.callable.call(coerced, params))
    }

    pub fn name(&self) -> &str {
        self.callable.name()
    }

    pub fn hints(&self) -> &TypeHints {
        self.callable.hints()
    }

    /// The undecorated function
    pub fn inner(&self) -> &TypedCallable {
        &self.callable
    }

    pub fn has_warned(&self) -> bool {
        self.guard.has_warned()
    }
}

impl fmt::Debug for Pyfunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pyfunc")
            .field("callable", &self.callable)
            .field("guard", &self.guard)
            .finish()
    }
}
