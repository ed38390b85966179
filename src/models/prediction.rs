//! Prediction request/response

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::inference::Prediction;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub proba: f64,
    pub label: u8,
    pub threshold: f64,
    pub calibrated: bool,
    pub explanations: Vec<String>,
    pub model_ready: bool,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            proba: p.proba,
            label: p.label,
            threshold: p.threshold,
            calibrated: p.calibrated,
            explanations: p.explanations,
            model_ready: p.model_ready,
        }
    }
}

/// Error body shared by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
