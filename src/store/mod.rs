//! Model store for hintsig
//!
//! Persists each saved model as a JSON manifest carrying its signature,
//! input example and a CRC32 checksum, and serves predictions from loaded
//! models with the same validation the local model applies.

mod config;
mod errors;
mod loaded;
mod manifest;
mod model_store;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use loaded::LoadedModel;
pub use manifest::{model_uri, parse_model_uri, ModelManifest, FLAVOR, MANIFEST_FILE};
pub use model_store::{ModelInfo, ModelStore};
