//! Artifact Store - flat files on disk
//!
//! ```text
//! artifacts/
//!   model_final.json      serialized model (loaded once)
//!   threshold.json        {"threshold": <float>} (loaded once)
//!   metrics_before.json   flat metric map (read per request)
//!   metrics_after.json    flat metric map (read per request)
//! static/
//!   model_info.json       model description (read per request)
//! ```

pub mod metrics;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::Config;
use crate::inference::ModelState;

pub use metrics::MetricsReport;

pub const MODEL_FILE: &str = "model_final.json";
pub const THRESHOLD_FILE: &str = "threshold.json";
pub const METRICS_BEFORE_FILE: &str = "metrics_before.json";
pub const METRICS_AFTER_FILE: &str = "metrics_after.json";
pub const MODEL_INFO_FILE: &str = "model_info.json";

/// Outcome of reading a static JSON document
#[derive(Debug)]
pub enum StaticDocument {
    Found(Value),
    Missing,
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    artifacts_dir: PathBuf,
    static_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(artifacts_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifacts_dir: artifacts_dir.into(),
            static_dir: static_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.artifacts_dir.clone(), config.static_dir.clone())
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifacts_dir.join(MODEL_FILE)
    }

    pub fn threshold_path(&self) -> PathBuf {
        self.artifacts_dir.join(THRESHOLD_FILE)
    }

    pub fn model_info_path(&self) -> PathBuf {
        self.static_dir.join(MODEL_INFO_FILE)
    }

    /// Load model and threshold; see [`ModelState::load`].
    pub fn load_model_state(&self) -> ModelState {
        tracing::info!("Loading artifacts from {}", self.artifacts_dir.display());
        ModelState::load(&self.model_path(), &self.threshold_path())
    }

    /// Read both metric snapshots. Missing or malformed files count as empty.
    pub async fn read_metrics(&self) -> MetricsReport {
        let before = self.read_metric_map(METRICS_BEFORE_FILE).await;
        let after = self.read_metric_map(METRICS_AFTER_FILE).await;
        MetricsReport::from_snapshots(&before, &after)
    }

    async fn read_metric_map(&self, file: &str) -> Map<String, Value> {
        match read_json(&self.artifacts_dir.join(file)).await {
            StaticDocument::Found(Value::Object(map)) => map,
            StaticDocument::Found(_) => {
                tracing::warn!("{} is not a JSON object, treating as empty", file);
                Map::new()
            }
            StaticDocument::Missing => Map::new(),
            StaticDocument::Malformed(e) => {
                tracing::warn!("{} is malformed ({}), treating as empty", file, e);
                Map::new()
            }
        }
    }

    pub async fn read_model_info(&self) -> StaticDocument {
        read_json(&self.model_info_path()).await
    }
}

async fn read_json(path: &Path) -> StaticDocument {
    match tokio::fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => StaticDocument::Found(value),
            Err(e) => StaticDocument::Malformed(e.to_string()),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StaticDocument::Missing,
        Err(e) => StaticDocument::Malformed(e.to_string()),
    }
}
