//! # Model Store
//!
//! Saves predict logic together with its inferred signature and loads it
//! back by URI.
//!
//! Manifests live on disk under `<root>/models/<id>/`. Predict logic is
//! code and cannot be serialized, so it is kept in an in-process registry
//! keyed by model id; loading a model whose logic was registered by another
//! process fails with [`StoreError::LogicMissing`]. Registered logic is kept
//! until the model is removed with [`ModelStore::delete`].

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};
use crate::pyfunc::{infer_model_signature, ModelLogic};
use crate::schema::ModelSignature;
use crate::value::Value;

use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::loaded::LoadedModel;
use super::manifest::{model_uri, parse_model_uri, ModelManifest, MANIFEST_FILE};

/// Result of saving a model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub model_id: Uuid,
    /// `models:/<id>`
    pub model_uri: String,
    pub signature: Option<ModelSignature>,
    /// Directory holding the manifest
    pub path: PathBuf,
}

/// Model store
#[derive(Debug)]
pub struct ModelStore {
    config: StoreConfig,
    logic: RwLock<HashMap<Uuid, ModelLogic>>,
}

impl ModelStore {
    /// Opens a store, creating its models directory.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let models_dir = config.models_dir();
        fs::create_dir_all(&models_dir).map_err(|e| StoreError::io(&models_dir, e))?;

        Ok(Self {
            config,
            logic: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Saves a model.
    ///
    /// The signature is `signature` when given, otherwise it is inferred
    /// from the logic's type hints or the input example. Problems with the
    /// hints are logged as warnings and never fail the save.
    pub fn save(
        &self,
        logic: impl Into<ModelLogic>,
        input_example: Option<Value>,
        signature: Option<ModelSignature>,
    ) -> StoreResult<ModelInfo> {
        let logic = logic.into();
        let signature = infer_model_signature(
            &logic,
            input_example.as_ref(),
            signature,
            self.config.warn_undecorated,
        );

        let model_id = Uuid::new_v4();
        let dir = self.model_dir(&model_id);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let manifest = ModelManifest::new(model_id, logic.name(), signature.clone(), input_example)?;
        manifest.write_to_file(&dir.join(MANIFEST_FILE))?;

        {
            let mut registry = self
                .logic
                .write()
                .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;
            registry.insert(model_id, logic);
        }

        let uri = model_uri(&model_id);
        if signature.is_some() {
            log_event_with_fields(Event::SignatureInferred, &[("model_uri", &uri)]);
        }
        log_event_with_fields(
            Event::ModelSaved,
            &[("model_uri", &uri), ("checksum", &manifest.payload_checksum)],
        );

        Ok(ModelInfo {
            model_id,
            model_uri: uri,
            signature,
            path: dir,
        })
    }

    /// Loads a model saved by this store.
    pub fn load(&self, uri: &str) -> StoreResult<LoadedModel> {
        let model_id = parse_model_uri(uri)?;
        let path = self.model_dir(&model_id).join(MANIFEST_FILE);
        if !path.exists() {
            return Err(StoreError::NotFound(uri.to_string()));
        }

        let manifest = ModelManifest::read_from_file(&path)?;
        if self.config.verify_checksums {
            manifest.verify()?;
        }

        let logic = {
            let registry = self
                .logic
                .read()
                .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;
            registry
                .get(&model_id)
                .cloned()
                .ok_or_else(|| StoreError::LogicMissing(uri.to_string()))?
        };

        log_event_with_fields(Event::ModelLoaded, &[("model_uri", uri)]);

        Ok(LoadedModel::new(
            model_id,
            manifest.signature,
            manifest.input_example,
            logic,
            self.config.validate_outputs,
        ))
    }

    /// Reads the manifest of a saved model without loading its logic.
    pub fn manifest(&self, uri: &str) -> StoreResult<ModelManifest> {
        let model_id = parse_model_uri(uri)?;
        let path = self.model_dir(&model_id).join(MANIFEST_FILE);
        if !path.exists() {
            return Err(StoreError::NotFound(uri.to_string()));
        }
        ModelManifest::read_from_file(&path)
    }

    /// Removes a saved model: its directory and its registered logic.
    pub fn delete(&self, uri: &str) -> StoreResult<()> {
        let model_id = parse_model_uri(uri)?;
        let dir = self.model_dir(&model_id);
        if !dir.join(MANIFEST_FILE).exists() {
            return Err(StoreError::NotFound(uri.to_string()));
        }

        fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        {
            let mut registry = self
                .logic
                .write()
                .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;
            registry.remove(&model_id);
        }

        log_event_with_fields(Event::ModelDeleted, &[("model_uri", uri)]);
        Ok(())
    }

    /// Ids of every model with a manifest on disk, sorted
    pub fn list(&self) -> StoreResult<Vec<Uuid>> {
        let models_dir = self.config.models_dir();
        let entries = fs::read_dir(&models_dir).map_err(|e| StoreError::io(&models_dir, e))?;

        let mut ids: Vec<Uuid> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join(MANIFEST_FILE).exists())
            .filter_map(|entry| Uuid::parse_str(&entry.file_name().to_string_lossy()).ok())
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn model_dir(&self, model_id: &Uuid) -> PathBuf {
        self.config.models_dir().join(model_id.to_string())
    }
}
