//! Final estimators and probability calibration

use serde::{Deserialize, Serialize};

use super::frame::FeatureFrame;
use super::{ArtifactError, PredictError};

/// Binary classifier at the end of a pipeline (or standing alone)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression(LogisticRegression),
    /// Constant positive-class prior, ignores its input
    Prior(PriorClassifier),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
    /// Input column order when the classifier is fed a raw frame
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorClassifier {
    pub positive_prior: f64,
}

/// Platt scaling: `1 / (1 + exp(a * f + b))` over a decision value `f`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SigmoidCalibrator {
    pub a: f64,
    pub b: f64,
}

pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl SigmoidCalibrator {
    pub fn calibrate(&self, decision: f64) -> f64 {
        sigmoid(-(self.a * decision + self.b))
    }
}

impl LogisticRegression {
    pub fn decision(&self, x: &[f64]) -> Result<f64, PredictError> {
        if x.len() != self.coef.len() {
            return Err(PredictError::FeatureCount {
                got: x.len(),
                expected: self.coef.len(),
            });
        }
        Ok(self.intercept + self.coef.iter().zip(x).map(|(w, v)| w * v).sum::<f64>())
    }
}

impl Classifier {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Classifier::LogisticRegression(lr) => {
                if lr.coef.iter().any(|w| !w.is_finite()) || !lr.intercept.is_finite() {
                    return Err(ArtifactError::Invalid("logistic regression weights must be finite".into()));
                }
                if let Some(names) = &lr.feature_names {
                    if names.len() != lr.coef.len() {
                        return Err(ArtifactError::Invalid(format!(
                            "logistic regression has {} coefficients but {} feature names",
                            lr.coef.len(),
                            names.len()
                        )));
                    }
                }
                Ok(())
            }
            Classifier::Prior(p) => {
                if (0.0..=1.0).contains(&p.positive_prior) {
                    Ok(())
                } else {
                    Err(ArtifactError::Invalid("prior must lie in [0, 1]".into()))
                }
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::LogisticRegression(_) => "logistic_regression",
            Classifier::Prior(_) => "prior",
        }
    }

    /// Coefficients for linear models, `None` otherwise
    pub fn coefficients(&self) -> Option<&[f64]> {
        match self {
            Classifier::LogisticRegression(lr) => Some(&lr.coef),
            Classifier::Prior(_) => None,
        }
    }

    pub fn has_decision_function(&self) -> bool {
        matches!(self, Classifier::LogisticRegression(_))
    }

    pub fn decision(&self, x: &[f64]) -> Result<f64, PredictError> {
        match self {
            Classifier::LogisticRegression(lr) => lr.decision(x),
            Classifier::Prior(_) => Err(PredictError::NoDecisionFunction),
        }
    }

    /// Positive-class probability for an already-encoded row
    pub fn predict_proba(&self, x: &[f64]) -> Result<f64, PredictError> {
        match self {
            Classifier::LogisticRegression(lr) => lr.decision(x).map(sigmoid),
            Classifier::Prior(p) => Ok(p.positive_prior),
        }
    }

    /// Assemble the classifier's input straight from a frame, without a
    /// preprocessing stage. Named features are read in order; unnamed models
    /// take the frame's columns in key order and must match in count.
    pub fn encode_frame(&self, frame: &FeatureFrame) -> Result<Vec<f64>, PredictError> {
        match self {
            Classifier::Prior(_) => Ok(Vec::new()),
            Classifier::LogisticRegression(lr) => match &lr.feature_names {
                Some(names) => {
                    let missing: Vec<&str> = names
                        .iter()
                        .map(String::as_str)
                        .filter(|name| !frame.contains(name))
                        .collect();
                    if !missing.is_empty() {
                        return Err(PredictError::MissingColumns(missing.join(", ")));
                    }
                    names.iter().map(|name| frame.numeric(name)).collect()
                }
                None => {
                    if frame.len() != lr.coef.len() {
                        return Err(PredictError::FeatureCount {
                            got: frame.len(),
                            expected: lr.coef.len(),
                        });
                    }
                    frame.column_names().map(|name| frame.numeric(name)).collect()
                }
            },
        }
    }
}
