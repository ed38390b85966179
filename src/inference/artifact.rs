//! Model artifact
//!
//! The serialized form is a tagged tree (`calibrated` / `pipeline` /
//! `estimator`). It is resolved once, at load, into [`LoadedModel`], which
//! fixes the shape and the preprocessor so requests never probe structure.
//!
//! Preprocessor resolution order:
//! 1. calibration wrapper around a pipeline: the pipeline's `pre` step
//! 2. direct pipeline: its `pre` step
//! 3. anything else: no preprocessor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::{Classifier, SigmoidCalibrator};
use super::frame::FeatureFrame;
use super::transform::ColumnTransformer;
use super::{ArtifactError, PredictError};

/// Name of the preprocessing step inside a pipeline
pub const PREPROCESSOR_STEP: &str = "pre";

// ============================================================================
// SERIALIZED FORM
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub version: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub model: ModelNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelNode {
    Calibrated {
        base: Box<ModelNode>,
        calibrators: Vec<SigmoidCalibrator>,
    },
    Pipeline {
        steps: Vec<PipelineStep>,
    },
    Estimator {
        estimator: Classifier,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStep {
    pub name: String,
    #[serde(flatten)]
    pub stage: Stage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    ColumnTransformer(ColumnTransformer),
    LogisticRegression(super::classifier::LogisticRegression),
    Prior(super::classifier::PriorClassifier),
}

// ============================================================================
// RESOLVED FORM
// ============================================================================

/// Artifact shape, fixed at load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactShape {
    CalibratedPipeline,
    CalibratedEstimator,
    Pipeline,
    Estimator,
}

impl ArtifactShape {
    pub fn is_calibrated(&self) -> bool {
        matches!(self, ArtifactShape::CalibratedPipeline | ArtifactShape::CalibratedEstimator)
    }
}

/// Optional transformer step followed by a classifier
#[derive(Debug, Clone)]
pub struct Pipeline {
    transformer: Option<(String, ColumnTransformer)>,
    classifier: Classifier,
}

impl Pipeline {
    fn from_steps(steps: Vec<PipelineStep>) -> Result<Self, ArtifactError> {
        let mut transformer = None;
        let mut classifier = None;
        let count = steps.len();

        for (i, step) in steps.into_iter().enumerate() {
            let last = i + 1 == count;
            match (step.stage, last) {
                (Stage::ColumnTransformer(t), false) if transformer.is_none() => {
                    t.validate()?;
                    transformer = Some((step.name, t));
                }
                (Stage::LogisticRegression(lr), true) => {
                    classifier = Some(Classifier::LogisticRegression(lr));
                }
                (Stage::Prior(p), true) => classifier = Some(Classifier::Prior(p)),
                _ => {
                    return Err(ArtifactError::Invalid(format!(
                        "pipeline step '{}' is out of place; expected [transformer] -> classifier",
                        step.name
                    )))
                }
            }
        }

        let classifier = classifier
            .ok_or_else(|| ArtifactError::Invalid("pipeline has no classifier step".into()))?;
        classifier.validate()?;

        Ok(Self { transformer, classifier })
    }

    /// The `pre` step, if the pipeline has one
    pub fn preprocessor(&self) -> Option<&ColumnTransformer> {
        self.transformer
            .as_ref()
            .filter(|(name, _)| name == PREPROCESSOR_STEP)
            .map(|(_, t)| t)
    }

    fn encode(&self, frame: &FeatureFrame) -> Result<Vec<f64>, PredictError> {
        match &self.transformer {
            Some((_, t)) => t.transform(frame),
            None => self.classifier.encode_frame(frame),
        }
    }
}

/// Uncalibrated predictor: a pipeline or a bare classifier
#[derive(Debug, Clone)]
pub enum BaseModel {
    Pipeline(Pipeline),
    Estimator(Classifier),
}

impl BaseModel {
    fn resolve(node: ModelNode) -> Result<Self, ArtifactError> {
        match node {
            ModelNode::Pipeline { steps } => Pipeline::from_steps(steps).map(BaseModel::Pipeline),
            ModelNode::Estimator { estimator } => {
                estimator.validate()?;
                Ok(BaseModel::Estimator(estimator))
            }
            ModelNode::Calibrated { .. } => {
                Err(ArtifactError::Invalid("nested calibration wrappers are not supported".into()))
            }
        }
    }

    pub fn classifier(&self) -> &Classifier {
        match self {
            BaseModel::Pipeline(p) => &p.classifier,
            BaseModel::Estimator(c) => c,
        }
    }

    fn encode(&self, frame: &FeatureFrame) -> Result<Vec<f64>, PredictError> {
        match self {
            BaseModel::Pipeline(p) => p.encode(frame),
            BaseModel::Estimator(c) => c.encode_frame(frame),
        }
    }

    fn decision(&self, frame: &FeatureFrame) -> Result<f64, PredictError> {
        let x = self.encode(frame)?;
        self.classifier().decision(&x)
    }

    fn predict_proba(&self, frame: &FeatureFrame) -> Result<f64, PredictError> {
        let x = self.encode(frame)?;
        self.classifier().predict_proba(&x)
    }
}

#[derive(Debug, Clone)]
enum Predictor {
    Calibrated {
        base: BaseModel,
        calibrators: Vec<SigmoidCalibrator>,
    },
    Plain(BaseModel),
}

/// A validated, immutable model ready to serve
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub version: String,
    pub created_at: Option<DateTime<Utc>>,
    /// SHA-256 of the artifact bytes, hex encoded
    pub digest: String,
    shape: ArtifactShape,
    predictor: Predictor,
}

impl LoadedModel {
    /// Parse, validate and resolve raw artifact bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let envelope: ArtifactEnvelope = serde_json::from_slice(bytes)?;
        let digest = hex::encode(Sha256::digest(bytes));
        Self::resolve(envelope, digest)
    }

    fn resolve(envelope: ArtifactEnvelope, digest: String) -> Result<Self, ArtifactError> {
        let (shape, predictor) = match envelope.model {
            ModelNode::Calibrated { base, calibrators } => {
                if calibrators.is_empty() {
                    return Err(ArtifactError::Invalid("calibration wrapper has no calibrators".into()));
                }
                if calibrators.iter().any(|c| !c.a.is_finite() || !c.b.is_finite()) {
                    return Err(ArtifactError::Invalid("calibrator parameters must be finite".into()));
                }
                let base = BaseModel::resolve(*base)?;
                if !base.classifier().has_decision_function() {
                    return Err(ArtifactError::Invalid(format!(
                        "calibrated base estimator '{}' has no decision function",
                        base.classifier().kind()
                    )));
                }
                let shape = match base {
                    BaseModel::Pipeline(_) => ArtifactShape::CalibratedPipeline,
                    BaseModel::Estimator(_) => ArtifactShape::CalibratedEstimator,
                };
                (shape, Predictor::Calibrated { base, calibrators })
            }
            node => {
                let base = BaseModel::resolve(node)?;
                let shape = match base {
                    BaseModel::Pipeline(_) => ArtifactShape::Pipeline,
                    BaseModel::Estimator(_) => ArtifactShape::Estimator,
                };
                (shape, Predictor::Plain(base))
            }
        };

        Ok(Self {
            version: envelope.version,
            created_at: envelope.created_at,
            digest,
            shape,
            predictor,
        })
    }

    pub fn shape(&self) -> ArtifactShape {
        self.shape
    }

    pub fn is_calibrated(&self) -> bool {
        self.shape.is_calibrated()
    }

    fn base(&self) -> &BaseModel {
        match &self.predictor {
            Predictor::Calibrated { base, .. } => base,
            Predictor::Plain(base) => base,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        self.base().classifier()
    }

    /// Preprocessing stage, following the resolution order in the module docs
    pub fn preprocessor(&self) -> Option<&ColumnTransformer> {
        match self.base() {
            BaseModel::Pipeline(p) => p.preprocessor(),
            BaseModel::Estimator(_) => None,
        }
    }

    /// Positive-class probability for one row
    pub fn predict_proba(&self, frame: &FeatureFrame) -> Result<f64, PredictError> {
        let proba = match &self.predictor {
            Predictor::Calibrated { base, calibrators } => {
                let decision = base.decision(frame)?;
                calibrators.iter().map(|c| c.calibrate(decision)).sum::<f64>() / calibrators.len() as f64
            }
            Predictor::Plain(base) => base.predict_proba(frame)?,
        };

        if proba.is_finite() {
            Ok(proba)
        } else {
            Err(PredictError::NonFinite)
        }
    }
}
