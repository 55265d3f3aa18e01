//! hintsig - Type-hint driven model signatures and input validation
//!
//! Derives a column schema from the type hints a predict function declares,
//! validates (and coerces) model input against those hints at call time, and
//! persists the signature with the saved model so a loaded model behaves
//! exactly like the local one.
//!
//! ```ignore
//! use hintsig::hints::{TypeHint, TypeHints};
//! use hintsig::pyfunc::{pyfunc, TypedCallable};
//! use hintsig::store::{ModelStore, StoreConfig};
//!
//! let predict = pyfunc(TypedCallable::new(
//!     "predict",
//!     TypeHints::same(TypeHint::list(TypeHint::str())),
//!     |input, _| Ok(input),
//! ));
//! let store = ModelStore::open(StoreConfig::new("/tmp/hintsig"))?;
//! let info = store.save(predict, None, None)?;
//! let model = store.load(&info.model_uri)?;
//! ```

pub mod hints;
pub mod observability;
pub mod pyfunc;
pub mod schema;
pub mod store;
pub mod value;
