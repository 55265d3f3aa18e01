//! Runtime values exchanged with predict functions.

mod convert;
mod types;

pub use types::{Frame, Record, Value};
