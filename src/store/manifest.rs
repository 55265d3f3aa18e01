//! Saved model manifest
//!
//! `MLmodel.json` is the authoritative descriptor of a saved model:
//!
//! ```json
//! {
//!   "model_id": "6f1c0a1e-...",
//!   "created_at": "2026-02-04T11:30:00Z",
//!   "flavor": "python_function",
//!   "predict_fn": "predict",
//!   "signature": { "inputs": [...], "outputs": [...], "from_type_hint": true },
//!   "input_example": null,
//!   "payload_checksum": "crc32:deadbeef",
//!   "format_version": 1
//! }
//! ```
//!
//! The checksum covers the signature and input example only.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::ModelSignature;
use crate::value::Value;

use super::errors::{StoreError, StoreResult};

/// File name of the manifest inside a model directory
pub const MANIFEST_FILE: &str = "MLmodel.json";

/// Flavor recorded for every saved model
pub const FLAVOR: &str = "python_function";

/// Saved model descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelManifest {
    pub model_id: Uuid,

    /// Creation timestamp in RFC3339 format
    pub created_at: String,

    pub flavor: String,

    /// Name of the predict logic
    pub predict_fn: String,

    pub signature: Option<ModelSignature>,

    pub input_example: Option<Value>,

    /// CRC32 of the signature and example (format: "crc32:XXXXXXXX")
    pub payload_checksum: String,

    /// Manifest format version (always 1)
    pub format_version: u8,
}

#[derive(Serialize)]
struct Payload<'a> {
    signature: &'a Option<ModelSignature>,
    input_example: &'a Option<Value>,
}

impl ModelManifest {
    /// Creates a manifest stamped with the current time and checksum.
    pub fn new(
        model_id: Uuid,
        predict_fn: impl Into<String>,
        signature: Option<ModelSignature>,
        input_example: Option<Value>,
    ) -> StoreResult<Self> {
        let payload_checksum = payload_checksum(&signature, &input_example)?;
        Ok(Self {
            model_id,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            flavor: FLAVOR.to_string(),
            predict_fn: predict_fn.into(),
            signature,
            input_example,
            payload_checksum,
            format_version: 1,
        })
    }

    /// Recomputes the payload checksum.
    pub fn compute_checksum(&self) -> StoreResult<String> {
        payload_checksum(&self.signature, &self.input_example)
    }

    /// Checks the stored checksum against the payload.
    pub fn verify(&self) -> StoreResult<()> {
        let actual = self.compute_checksum()?;
        if actual != self.payload_checksum {
            return Err(StoreError::ChecksumMismatch {
                uri: model_uri(&self.model_id),
                expected: self.payload_checksum.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Writes the manifest with fsync.
    pub fn write_to_file(&self, path: &Path) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::manifest(path, format!("Failed to serialize manifest: {}", e)))?;

        let mut file = File::create(path).map_err(|e| StoreError::io(path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| StoreError::io(path, e))?;
        file.sync_all().map_err(|e| StoreError::io(path, e))?;

        Ok(())
    }

    pub fn read_from_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| StoreError::manifest(path, format!("Failed to parse manifest: {}", e)))
    }
}

/// `models:/<id>`
pub fn model_uri(model_id: &Uuid) -> String {
    format!("models:/{}", model_id)
}

/// Extracts the model id from a `models:/<id>` URI.
pub fn parse_model_uri(uri: &str) -> StoreResult<Uuid> {
    let id = uri
        .strip_prefix("models:/")
        .ok_or_else(|| StoreError::InvalidUri(uri.to_string()))?;
    Uuid::parse_str(id.trim_end_matches('/')).map_err(|_| StoreError::InvalidUri(uri.to_string()))
}

/// Formats a CRC32 checksum as `crc32:xxxxxxxx`.
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

fn payload_checksum(
    signature: &Option<ModelSignature>,
    input_example: &Option<Value>,
) -> StoreResult<String> {
    let bytes = serde_json::to_vec(&Payload {
        signature,
        input_example,
    })
    .map_err(|e| StoreError::Internal(format!("Failed to serialize payload: {}", e)))?;

    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(format_checksum(hasher.finalize()))
}
