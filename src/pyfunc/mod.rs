//! Predict functions and models with type-hint validation
//!
//! Three forms of predict logic are supported:
//!
//! - [`TypedCallable`]: a plain function with declared hints
//! - [`Pyfunc`]: the same function wrapped by [`pyfunc`], validating input
//!   on every call
//! - [`PythonModel`]: a class-based model, validated through
//!   [`ValidatedModel`]
//!
//! All validating paths share [`HintGuard`], so a given bad input produces
//! the same error text whichever form the model takes, locally or after
//! a save/load round trip.

mod callable;
mod decorator;
mod errors;
mod guard;
mod logic;
mod model;
mod signature;

pub use callable::{Params, PredictFn, TypedCallable};
pub use decorator::{pyfunc, Pyfunc};
pub use errors::{PyfuncError, PyfuncResult};
pub use guard::HintGuard;
pub use logic::ModelLogic;
pub use model::{ModelContext, PythonModel, ValidatedModel};
pub use signature::infer_model_signature;
