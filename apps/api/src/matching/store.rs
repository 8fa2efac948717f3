//! Model store: loads the model file and publishes it to request handlers.
//!
//! Readers take a cheap `Arc` snapshot and match against it without holding
//! any lock. A reload builds a complete new model first and then swaps the
//! shared reference in a single write; a failed reload leaves the current
//! model in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::matching::model::{Model, ModelError, TargetClass};
use crate::matching::tokenizer::Tokenizer;

/// Metadata describing one loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub revision: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
    pub channel_count: usize,
    pub job_count: usize,
}

/// A model together with its load metadata.
#[derive(Debug)]
pub struct LoadedModel {
    pub model: Model,
    pub info: ModelInfo,
}

impl LoadedModel {
    fn new(model: Model, source: &Path) -> Self {
        let info = ModelInfo {
            revision: Uuid::new_v4(),
            loaded_at: Utc::now(),
            source: source.display().to_string(),
            channel_count: model.partition(TargetClass::Channel).len(),
            job_count: model.partition(TargetClass::Job).len(),
        };
        Self { model, info }
    }
}

/// Reads and builds the model at `path`.
pub async fn load_model_file(path: &Path, tokenizer: &Tokenizer) -> Result<LoadedModel, ModelError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let model = Model::from_json(&json, tokenizer)?;
    let loaded = LoadedModel::new(model, path);

    info!(
        revision = %loaded.info.revision,
        channels = loaded.info.channel_count,
        jobs = loaded.info.job_count,
        "Model loaded from {}",
        loaded.info.source
    );
    Ok(loaded)
}

/// Process-wide holder of the current model.
pub struct ModelStore {
    source: PathBuf,
    tokenizer: Tokenizer,
    current: RwLock<Arc<LoadedModel>>,
}

impl ModelStore {
    /// Loads the model at `source`. Fails if the file is missing or invalid.
    pub async fn open(source: impl Into<PathBuf>, tokenizer: Tokenizer) -> Result<Self, ModelError> {
        let source = source.into();
        let loaded = load_model_file(&source, &tokenizer).await?;
        Ok(Self {
            source,
            tokenizer,
            current: RwLock::new(Arc::new(loaded)),
        })
    }

    #[allow(dead_code)]
    /// Wraps an already-built model. Reloads still read from `source`.
    pub fn from_model(model: Model, source: impl Into<PathBuf>, tokenizer: Tokenizer) -> Self {
        let source = source.into();
        let loaded = LoadedModel::new(model, &source);
        Self {
            source,
            tokenizer,
            current: RwLock::new(Arc::new(loaded)),
        }
    }

    /// Snapshot of the current model. Later reloads do not affect it.
    pub fn current(&self) -> Arc<LoadedModel> {
        Arc::clone(&self.current.read())
    }

    pub fn info(&self) -> ModelInfo {
        self.current.read().info.clone()
    }

    /// Rebuilds the model from its source and swaps it in.
    pub async fn reload(&self) -> Result<ModelInfo, ModelError> {
        let loaded = Arc::new(load_model_file(&self.source, &self.tokenizer).await?);
        let info = loaded.info.clone();

        let previous = std::mem::replace(&mut *self.current.write(), loaded);
        info!(
            previous = %previous.info.revision,
            current = %info.revision,
            "Model swapped"
        );
        Ok(info)
    }
}
