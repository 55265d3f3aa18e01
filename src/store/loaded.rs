//! A model read back from the store

use uuid::Uuid;

use crate::pyfunc::{HintGuard, ModelContext, ModelLogic, Params, PyfuncResult};
use crate::schema::{enforce_columns, ModelSignature};
use crate::value::Value;

/// A saved model ready to serve predictions.
///
/// Validation matches the local decorated function or class: the same
/// guard runs, so a rejected input fails with the same message. Models
/// whose signature came from an input example also have their named
/// columns enforced.
#[derive(Debug)]
pub struct LoadedModel {
    model_id: Uuid,
    signature: Option<ModelSignature>,
    input_example: Option<Value>,
    logic: ModelLogic,
    guard: HintGuard,
    context: ModelContext,
}

impl LoadedModel {
    pub(crate) fn new(
        model_id: Uuid,
        signature: Option<ModelSignature>,
        input_example: Option<Value>,
        logic: ModelLogic,
        validate_outputs: bool,
    ) -> Self {
        // unsupported hints were already reported when the model was saved
        let guard = HintGuard::silent(logic.name(), &logic.type_hints())
            .with_output_validation(validate_outputs);
        Self {
            model_id,
            signature,
            input_example,
            logic,
            guard,
            context: ModelContext::for_model(model_id),
        }
    }

    pub fn model_id(&self) -> Uuid {
        self.model_id
    }

    pub fn signature(&self) -> Option<&ModelSignature> {
        self.signature.as_ref()
    }

    pub fn input_example(&self) -> Option<&Value> {
        self.input_example.as_ref()
    }

    /// Validates `model_input` and runs the model.
    pub fn predict(&self, model_input: impl Into<Value>, params: Option<&Params>) -> PyfuncResult<Value> {
        let model_input = model_input.into();

        if let Some(inputs) = self
            .signature
            .as_ref()
            .filter(|sig| !sig.from_type_hint)
            .and_then(|sig| sig.inputs.as_ref())
        {
            enforce_columns(inputs, &model_input)?;
        }

        self.guard.invoke(model_input, |coerced| {
            self.logic.invoke_raw(Some(&self.context), coerced, params)
        })
    }
}
