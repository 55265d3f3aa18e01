//! Predict logic accepted by the model store

use std::fmt;
use std::sync::Arc;

use crate::hints::TypeHints;
use crate::value::Value;

use super::callable::{Params, TypedCallable};
use super::decorator::Pyfunc;
use super::errors::PyfuncResult;
use super::model::{ModelContext, PythonModel, ValidatedModel};

/// Any of the three forms a model's predict logic can take
#[derive(Clone)]
pub enum ModelLogic {
    /// A bare function; its hints are used but not enforced
    Callable(TypedCallable),
    /// A function wrapped with [`pyfunc`](super::pyfunc)
    Decorated(Arc<Pyfunc>),
    /// A class-based model
    Class(Arc<dyn PythonModel>),
}

impl ModelLogic {
    pub fn class<M: PythonModel + 'static>(model: M) -> Self {
        ModelLogic::Class(Arc::new(model))
    }

    pub fn type_hints(&self) -> TypeHints {
        match self {
            ModelLogic::Callable(callable) => callable.hints().clone(),
            ModelLogic::Decorated(pyfunc) => pyfunc.hints().clone(),
            ModelLogic::Class(model) => model.type_hints(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ModelLogic::Callable(callable) => callable.name().to_string(),
            ModelLogic::Decorated(pyfunc) => pyfunc.name().to_string(),
            ModelLogic::Class(model) => model.name().to_string(),
        }
    }

    pub fn is_undecorated_callable(&self) -> bool {
        matches!(self, ModelLogic::Callable(_))
    }

    /// Runs the predict body with no validation.
    ///
    /// Decorated functions skip their own guard here; callers that want
    /// validation wrap this in a guard so the input is checked once.
    pub(crate) fn invoke_raw(
        &self,
        context: Option<&ModelContext>,
        input: Value,
        params: Option<&Params>,
    ) -> PyfuncResult<Value> {
        match self {
            ModelLogic::Callable(callable) => callable.call(input, params),
            ModelLogic::Decorated(pyfunc) => pyfunc.inner().call(input, params),
            ModelLogic::Class(model) => model.predict(context, input, params),
        }
    }
}

impl From<TypedCallable> for ModelLogic {
    fn from(callable: TypedCallable) -> Self {
        ModelLogic::Callable(callable)
    }
}

impl From<Pyfunc> for ModelLogic {
    fn from(pyfunc: Pyfunc) -> Self {
        ModelLogic::Decorated(Arc::new(pyfunc))
    }
}

impl From<Arc<Pyfunc>> for ModelLogic {
    fn from(pyfunc: Arc<Pyfunc>) -> Self {
        ModelLogic::Decorated(pyfunc)
    }
}

impl<M: PythonModel + 'static> From<&ValidatedModel<M>> for ModelLogic {
    fn from(model: &ValidatedModel<M>) -> Self {
        ModelLogic::Class(model.shared())
    }
}

impl<M: PythonModel + 'static> From<ValidatedModel<M>> for ModelLogic {
    fn from(model: ValidatedModel<M>) -> Self {
        ModelLogic::Class(model.shared())
    }
}

impl fmt::Debug for ModelLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ModelLogic::Callable(_) => "Callable",
            ModelLogic::Decorated(_) => "Decorated",
            ModelLogic::Class(_) => "Class",
        };
        write!(f, "ModelLogic::{}({})", kind, self.name())
    }
}
