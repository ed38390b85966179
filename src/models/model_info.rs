//! Model description and service health

use serde::{Deserialize, Serialize};

/// Typed view over `model_info.json`. The server passes the file through
/// verbatim; clients read it with this lenient shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub purpose: String,
    pub intended_user: String,
    pub decision_supported: String,
    pub fairness: FairnessInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessInfo {
    pub protected_attribute: Option<String>,
    pub mitigations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_ready: bool,
    pub version: String,
    pub timestamp: i64,
}
