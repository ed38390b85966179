//! Model State
//!
//! Everything the prediction path needs, built once at startup and only
//! read afterwards. `NotReady` is the initial state and persists on any load
//! failure; `Ready` is terminal.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::artifact::{ArtifactShape, LoadedModel};
use super::explain::explanations_or_fallback;
use super::frame::FeatureFrame;
use super::threshold::DecisionThreshold;
use super::{ArtifactError, PredictError};

pub const NOT_LOADED_MESSAGE: &str = "Model not loaded. Add artifacts.";

#[derive(Debug)]
pub enum ModelStatus {
    NotReady { reason: String },
    Ready(Box<LoadedModel>),
}

#[derive(Debug)]
pub struct ModelState {
    status: ModelStatus,
    threshold: DecisionThreshold,
}

/// Outcome of one prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub proba: f64,
    pub label: u8,
    pub threshold: f64,
    pub calibrated: bool,
    pub explanations: Vec<String>,
    pub model_ready: bool,
}

impl ModelState {
    pub fn new(status: ModelStatus, threshold: DecisionThreshold) -> Self {
        Self { status, threshold }
    }

    pub fn ready(model: LoadedModel, threshold: DecisionThreshold) -> Self {
        Self::new(ModelStatus::Ready(Box::new(model)), threshold)
    }

    pub fn not_ready(reason: impl Into<String>, threshold: DecisionThreshold) -> Self {
        Self::new(ModelStatus::NotReady { reason: reason.into() }, threshold)
    }

    /// Load the model and threshold. Never fails: problems are logged and
    /// leave the model not ready.
    pub fn load(model_path: &Path, threshold_path: &Path) -> Self {
        let threshold = DecisionThreshold::load(threshold_path);

        let state = match load_model(model_path) {
            Ok(model) => {
                tracing::info!(
                    "Model loaded: version={} shape={:?} sha256={}",
                    model.version,
                    model.shape(),
                    model.digest
                );
                match model.shape() {
                    ArtifactShape::CalibratedPipeline if model.preprocessor().is_some() => {
                        tracing::info!("Extracted preprocessor from calibrated pipeline");
                    }
                    ArtifactShape::Pipeline if model.preprocessor().is_some() => {
                        tracing::info!("Model is a simple pipeline");
                    }
                    _ => tracing::warn!("No preprocessor found inside model"),
                }
                Self::ready(model, threshold)
            }
            Err(e) => {
                tracing::error!("Failed to load model from {}: {}", model_path.display(), e);
                Self::not_ready(e.to_string(), threshold)
            }
        };

        tracing::info!(
            "Model state: ready={} calibrated={} threshold={}",
            state.is_ready(),
            state.is_calibrated(),
            state.threshold.value()
        );
        state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status, ModelStatus::Ready(_))
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        match &self.status {
            ModelStatus::Ready(model) => Some(model.as_ref()),
            ModelStatus::NotReady { .. } => None,
        }
    }

    pub fn not_ready_reason(&self) -> Option<&str> {
        match &self.status {
            ModelStatus::NotReady { reason } => Some(reason.as_str()),
            ModelStatus::Ready(_) => None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.model().is_some_and(LoadedModel::is_calibrated)
    }

    pub fn threshold(&self) -> DecisionThreshold {
        self.threshold
    }

    /// Score one feature mapping. Without a model this is a successful,
    /// zero-probability answer flagged `model_ready = false`.
    pub fn predict(&self, features: Map<String, Value>) -> Result<Prediction, PredictError> {
        let Some(model) = self.model() else {
            return Ok(Prediction {
                proba: 0.0,
                label: 0,
                threshold: self.threshold.value(),
                calibrated: false,
                explanations: vec![NOT_LOADED_MESSAGE.to_string()],
                model_ready: false,
            });
        };

        let frame = FeatureFrame::new(features).without_protected();
        let proba = model.predict_proba(&frame)?;

        Ok(Prediction {
            proba,
            label: self.threshold.label(proba),
            threshold: self.threshold.value(),
            calibrated: model.is_calibrated(),
            explanations: explanations_or_fallback(model),
            model_ready: true,
        })
    }
}

fn load_model(path: &Path) -> Result<LoadedModel, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    LoadedModel::from_bytes(&bytes)
}
