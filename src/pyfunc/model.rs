//! # Class-Based Models
//!
//! Models that implement [`PythonModel`] declare their hints once, in
//! `type_hints`. [`ValidatedModel`] gives them the same runtime checks a
//! decorated function gets.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use crate::hints::TypeHints;
use crate::value::Value;

use super::callable::Params;
use super::errors::PyfuncResult;
use super::guard::HintGuard;

/// Context handed to a class-based model's predict
#[derive(Debug, Clone, Default)]
pub struct ModelContext {
    /// Identifier of the saved model, once loaded
    pub model_id: Option<Uuid>,
    /// Named artifact paths
    pub artifacts: BTreeMap<String, PathBuf>,
}

impl ModelContext {
    pub fn for_model(model_id: Uuid) -> Self {
        Self {
            model_id: Some(model_id),
            artifacts: BTreeMap::new(),
        }
    }
}

/// A user model with a predict method
pub trait PythonModel: Send + Sync {
    /// Hints declared on `predict`
    fn type_hints(&self) -> TypeHints;

    fn predict(
        &self,
        context: Option<&ModelContext>,
        model_input: Value,
        params: Option<&Params>,
    ) -> PyfuncResult<Value>;

    /// Name used in log lines
    fn name(&self) -> &str {
        "PythonModel"
    }
}

/// A [`PythonModel`] whose predict validates its input.
pub struct ValidatedModel<M: PythonModel> {
    model: Arc<M>,
    guard: HintGuard,
}

impl<M: PythonModel> ValidatedModel<M> {
    /// Wraps `model`; an unsupported input hint is reported here, once.
    pub fn new(model: M) -> Self {
        let guard = HintGuard::new(model.name(), &model.type_hints());
        guard.warn_unsupported_once();
        Self {
            model: Arc::new(model),
            guard,
        }
    }

    pub fn predict(
        &self,
        context: Option<&ModelContext>,
        model_input: impl Into<Value>,
        params: Option<&Params>,
    ) -> PyfuncResult<Value> {
        self.guard.invoke(model_input.into(), |coerced| {
            self.model.predict(context, coerced, params)
        })
    }

    /// The unwrapped model
    pub fn model(&self) -> &M {
        &self.model
    }

    pub(crate) fn shared(&self) -> Arc<M> {
        Arc::clone(&self.model)
    }
}

impl<M: PythonModel> fmt::Debug for ValidatedModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedModel")
            .field("model", &self.model.name())
            .field("guard", &self.guard)
            .finish()
    }
}
