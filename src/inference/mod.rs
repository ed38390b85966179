//! Inference Module - model artifact, preprocessing and scoring
//!
//! Loading is separated from request handling: the artifact is resolved
//! once into an immutable [`ModelState`], handlers only read it.

pub mod artifact;
pub mod classifier;
pub mod explain;
pub mod frame;
pub mod state;
pub mod threshold;
pub mod transform;

use thiserror::Error;

// Re-export common types
pub use artifact::{ArtifactShape, LoadedModel};
pub use frame::FeatureFrame;
pub use state::{ModelState, ModelStatus, Prediction};
pub use threshold::DecisionThreshold;

/// Failure to turn an artifact file into a servable model
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Failure while scoring a request
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("columns are missing: {0}")]
    MissingColumns(String),

    #[error("could not convert value {value} of column '{column}' to float")]
    NotNumeric { column: String, value: String },

    #[error("X has {got} features, but the classifier is expecting {expected} features as input")]
    FeatureCount { got: usize, expected: usize },

    #[error("estimator has no decision function")]
    NoDecisionFunction,

    #[error("model produced a non-finite probability")]
    NonFinite,
}

/// Failure while ranking coefficients; never leaves the explain module's caller
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("{names} feature names for {coefs} coefficients")]
    LengthMismatch { names: usize, coefs: usize },
}
