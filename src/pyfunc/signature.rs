//! # Save-Time Signature Inference
//!
//! Chooses a signature for a model being saved, in order of preference:
//!
//! 1. An explicit signature, used as-is
//! 2. The declared input hint (and output hint, if any)
//! 3. The input example, when the hint is a pass-through, unsupported, or
//!    absent
//!
//! A return-only hint disables inference. Every failure is a warning; the
//! model is saved regardless.

use crate::hints::{TypeHint, TypeHints};
use crate::observability::{warn_event, Event};
use crate::schema::{
    check_hint, coerce_and_validate, schema_from_example, schema_from_hint, validate,
    ModelSignature, Schema,
};
use crate::value::Value;

use super::logic::ModelLogic;

/// Derives the signature persisted with a saved model.
pub fn infer_model_signature(
    logic: &ModelLogic,
    input_example: Option<&Value>,
    explicit: Option<ModelSignature>,
    warn_undecorated: bool,
) -> Option<ModelSignature> {
    if explicit.is_some() {
        return explicit;
    }

    let hints = logic.type_hints();
    let name = logic.name();

    let input_hint = match &hints.input {
        Some(hint) => hint,
        None => {
            if let Some(output) = &hints.output {
                let message = format!(
                    "Only the return type of `{}` is annotated (`{}`), model signature inference \
                     from type hints is skipped.",
                    name, output
                );
                warn_event(Event::SignatureSkipped, &message, &[("function", &name)]);
                return None;
            }
            return input_example.and_then(|example| match signature_from_example(logic, example) {
                Ok(signature) => Some(signature),
                Err(reason) => {
                    warn_event(Event::SignatureFailed, &reason, &[("function", &name)]);
                    None
                }
            });
        }
    };

    if input_hint.is_passthrough() {
        return match input_example {
            None => {
                warn_passthrough(input_hint, "Input example is not provided, model signature cannot be inferred.");
                None
            }
            Some(example) => match signature_from_example(logic, example) {
                Ok(signature) => Some(signature),
                Err(reason) => {
                    warn_passthrough(input_hint, &reason);
                    None
                }
            },
        };
    }

    let inputs = match schema_from_hint(input_hint) {
        Ok(inputs) => inputs,
        Err(err) => {
            let message = if input_example.is_some() {
                format!("{} Inferring model signature from the input example instead.", err.message())
            } else {
                err.message().to_string()
            };
            warn_event(
                Event::TypeHintUnsupported,
                &message,
                &[("function", &name), ("hint", &input_hint.to_string())],
            );
            return input_example.and_then(|example| match signature_from_example(logic, example) {
                Ok(signature) => Some(signature),
                Err(reason) => {
                    warn_event(Event::SignatureFailed, &reason, &[("function", &name)]);
                    None
                }
            });
        }
    };

    if warn_undecorated && logic.is_undecorated_callable() {
        warn_event(
            Event::UndecoratedCallable,
            "Decorate your function with `@pyfunc` to enable validation of the model input \
             against the type hints of the `predict` function.",
            &[("function", &name)],
        );
    }

    Some(signature_from_hints(logic, &hints, input_hint, inputs, input_example))
}

fn warn_passthrough(hint: &TypeHint, reason: &str) {
    let message = format!(
        "Type hint `{}` cannot be used to infer model signature. {}",
        hint, reason
    );
    warn_event(Event::SignatureFailed, &message, &[("hint", &hint.to_string())]);
}

/// Inputs from the example; outputs from running the logic on it, if that works.
fn signature_from_example(logic: &ModelLogic, example: &Value) -> Result<ModelSignature, String> {
    let inputs = schema_from_example(example).map_err(|err| {
        format!("Inferring model signature from input example failure: {}", err.message())
    })?;
    let outputs = logic
        .invoke_raw(None, example.clone(), None)
        .ok()
        .and_then(|output| schema_from_example(&output).ok());
    Ok(ModelSignature::new(Some(inputs), outputs))
}

fn signature_from_hints(
    logic: &ModelLogic,
    hints: &TypeHints,
    input_hint: &TypeHint,
    inputs: Schema,
    input_example: Option<&Value>,
) -> ModelSignature {
    let output_hint = hints
        .output
        .as_ref()
        .filter(|hint| !hint.is_passthrough() && check_hint(hint).is_ok());
    let mut outputs = output_hint
        .and_then(|hint| schema_from_hint(hint).ok())
        .unwrap_or_else(Schema::any);

    let Some(example) = input_example else {
        return ModelSignature::from_type_hints(inputs, outputs);
    };
    let name = logic.name();

    match coerce_and_validate(input_hint, example) {
        Err(err) => {
            let message = format!(
                "Input example is not compatible with the type hint of the `predict` function. \
                 Error: {}",
                err.message()
            );
            warn_event(Event::InputExampleIncompatible, &message, &[("function", &name)]);
        }
        Ok(coerced) => {
            if let Some(hint) = output_hint {
                match logic.invoke_raw(None, coerced, None) {
                    Ok(output) => {
                        if let Err(err) = validate(hint, &output) {
                            let message = format!(
                                "Failed to validate output `{}` against type hint `{}`, setting \
                                 output schema to Any. Error: {}",
                                output,
                                hint,
                                err.message()
                            );
                            warn_event(Event::PredictOutputMismatch, &message, &[("function", &name)]);
                            outputs = Schema::any();
                        }
                    }
                    Err(err) => {
                        let message = format!(
                            "Failed to run predict on the input example: {}",
                            err.message()
                        );
                        warn_event(Event::SignatureFailed, &message, &[("function", &name)]);
                    }
                }
            }
        }
    }

    ModelSignature::from_type_hints(inputs, outputs)
}
