//! # Hint Guard
//!
//! Per-callable validation state shared by the decorator, class-based
//! models and loaded models, so all three reject bad input with the same
//! message.
//!
//! The guard owns the "already warned" flag for its callable: the
//! unsupported-hint warning is emitted at most once per guard.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::hints::{TypeHint, TypeHints};
use crate::observability::{log_event_with_fields, warn_event, Event};
use crate::schema::{check_hint, coerce_and_validate, validate, SchemaError};
use crate::value::Value;

use super::errors::PyfuncResult;

/// How the model input is treated on each call
#[derive(Debug, Clone)]
enum InputCheck {
    /// Validate and coerce against the hint
    Validate(TypeHint),
    /// Recognised hint that accepts any input (tabular batches)
    PassThrough,
    /// Hint without schema mapping; input is not validated
    Unsupported(SchemaError),
    /// No input hint declared
    Absent,
}

/// Validation wrapper state for one predict function.
#[derive(Debug)]
pub struct HintGuard {
    owner: String,
    input: InputCheck,
    output: Option<TypeHint>,
    validate_outputs: bool,
    warned: AtomicBool,
}

impl HintGuard {
    /// Builds the guard for `hints`. Nothing is logged here.
    pub fn new(owner: impl Into<String>, hints: &TypeHints) -> Self {
        let input = match &hints.input {
            None => InputCheck::Absent,
            Some(hint) if hint.is_passthrough() => InputCheck::PassThrough,
            Some(hint) => match check_hint(hint) {
                Ok(()) => InputCheck::Validate(hint.clone()),
                Err(err) => InputCheck::Unsupported(err),
            },
        };
        let output = hints
            .output
            .as_ref()
            .filter(|hint| !hint.is_passthrough() && check_hint(hint).is_ok())
            .cloned();

        Self {
            owner: owner.into(),
            input,
            output,
            validate_outputs: true,
            warned: AtomicBool::new(false),
        }
    }

    /// A guard that treats its warning as already emitted.
    pub fn silent(owner: impl Into<String>, hints: &TypeHints) -> Self {
        let guard = Self::new(owner, hints);
        guard.warned.store(true, Ordering::Relaxed);
        guard
    }

    /// Enables or disables output validation.
    pub fn with_output_validation(mut self, enabled: bool) -> Self {
        self.validate_outputs = enabled;
        self
    }

    /// True when the input hint cannot be used for validation.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.input, InputCheck::Unsupported(_))
    }

    /// True when inputs are validated on every call.
    pub fn validates_input(&self) -> bool {
        matches!(self.input, InputCheck::Validate(_))
    }

    /// Whether the unsupported-hint warning has been emitted.
    pub fn has_warned(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }

    /// Emits the unsupported-hint warning the first time it is called.
    pub fn warn_unsupported_once(&self) {
        let InputCheck::Unsupported(err) = &self.input else {
            return;
        };
        if self.warned.swap(true, Ordering::Relaxed) {
            return;
        }
        let message = format!(
            "Type hint used in the model's predict function is not supported for model input \
             validation, the input will not be validated. {}",
            err.message()
        );
        warn_event(
            Event::TypeHintUnsupported,
            &message,
            &[("function", &self.owner), ("hint", err.hint().unwrap_or(""))],
        );
    }

    /// Validates and coerces the model input.
    pub fn coerce_input(&self, input: Value) -> PyfuncResult<Value> {
        let InputCheck::Validate(hint) = &self.input else {
            return Ok(input);
        };
        coerce_and_validate(hint, &input).map_err(|err| {
            log_event_with_fields(
                Event::PredictInputRejected,
                &[("function", &self.owner), ("message", err.message())],
            );
            err.into()
        })
    }

    /// Checks a produced output against the output hint; logs on mismatch.
    ///
    /// Returns false when the output did not match.
    pub fn check_output(&self, output: &Value) -> bool {
        let Some(hint) = self.output.as_ref().filter(|_| self.validate_outputs) else {
            return true;
        };
        match validate(hint, output) {
            Ok(()) => true,
            Err(err) => {
                let message = format!(
                    "Failed to validate output `{}` against type hint `{}`: {}",
                    output,
                    hint,
                    err.message()
                );
                warn_event(
                    Event::PredictOutputMismatch,
                    &message,
                    &[("function", &self.owner)],
                );
                false
            }
        }
    }

    /// One guarded call: warn (once), coerce input, run `body`, check output.
    pub fn invoke<F>(&self, input: Value, body: F) -> PyfuncResult<Value>
    where
        F: FnOnce(Value) -> PyfuncResult<Value>,
    {
        self.warn_unsupported_once();
        let coerced = self.coerce_input(input)?;
        let output = body(coerced)?;
        self.check_output(&output);
        Ok(output)
    }
}
