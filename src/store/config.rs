//! Model store configuration
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "root_dir": "/var/lib/hintsig",
//!   "verify_checksums": true,
//!   "warn_undecorated": true,
//!   "validate_outputs": true
//! }
//! ```
//!
//! Only `root_dir` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::errors::{StoreError, StoreResult};

/// Model store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `models/<id>/MLmodel.json` (required)
    pub root_dir: String,

    /// Verify manifest checksums on load (default true)
    #[serde(default = "default_true")]
    pub verify_checksums: bool,

    /// Advise decorating bare functions with supported hints (default true)
    #[serde(default = "default_true")]
    pub warn_undecorated: bool,

    /// Warn when predict output does not match its hint (default true)
    #[serde(default = "default_true")]
    pub validate_outputs: bool,
}

fn default_true() -> bool {
    true
}

impl StoreConfig {
    /// Configuration with defaults rooted at `root_dir`
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self {
            root_dir: root_dir.as_ref().display().to_string(),
            verify_checksums: default_true(),
            warn_undecorated: default_true(),
            validate_outputs: default_true(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("Failed to read config: {}", e)))?;

        let config: StoreConfig = serde_json::from_str(&content)
            .map_err(|e| StoreError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string()), ("root_dir", &config.root_dir)],
        );

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> StoreResult<()> {
        if self.root_dir.trim().is_empty() {
            return Err(StoreError::Config("root_dir is required".into()));
        }
        Ok(())
    }

    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.root_dir)
    }

    /// Directory holding saved models
    pub fn models_dir(&self) -> PathBuf {
        self.root().join("models")
    }
}
