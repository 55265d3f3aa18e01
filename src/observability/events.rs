//! Observable events for hintsig
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events emitted while inferring signatures and serving predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Type hints
    /// A predict function declares a hint the engine cannot map
    TypeHintUnsupported,

    // Predict calls
    /// Model input failed structural validation
    PredictInputRejected,
    /// Produced output does not match the declared output hint
    PredictOutputMismatch,

    // Signature inference
    /// Input example does not satisfy the declared input hint
    InputExampleIncompatible,
    /// Signature derived and attached to a model
    SignatureInferred,
    /// Signature inference skipped on purpose
    SignatureSkipped,
    /// Signature could not be inferred
    SignatureFailed,
    /// Plain function logged without the validating decorator
    UndecoratedCallable,

    // Store
    /// Model manifest written
    ModelSaved,
    /// Model manifest read back
    ModelLoaded,
    /// Model directory and registered logic removed
    ModelDeleted,
    /// Store configuration loaded
    ConfigLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::TypeHintUnsupported => "TYPE_HINT_UNSUPPORTED",

            Event::PredictInputRejected => "PREDICT_INPUT_REJECTED",
            Event::PredictOutputMismatch => "PREDICT_OUTPUT_MISMATCH",

            Event::InputExampleIncompatible => "INPUT_EXAMPLE_INCOMPATIBLE",
            Event::SignatureInferred => "SIGNATURE_INFERRED",
            Event::SignatureSkipped => "SIGNATURE_INFERENCE_SKIPPED",
            Event::SignatureFailed => "SIGNATURE_INFERENCE_FAILED",
            Event::UndecoratedCallable => "UNDECORATED_CALLABLE",

            Event::ModelSaved => "MODEL_SAVED",
            Event::ModelLoaded => "MODEL_LOADED",
            Event::ModelDeleted => "MODEL_DELETED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Returns true if this event is reported at WARN level
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::TypeHintUnsupported
                | Event::PredictOutputMismatch
                | Event::InputExampleIncompatible
                | Event::SignatureSkipped
                | Event::SignatureFailed
                | Event::UndecoratedCallable
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
