//! Column Transformer - preprocessing stage
//!
//! Turns a named feature frame into the dense vector a linear classifier
//! consumes. Each block owns a list of input columns and one encoder.
//! Columns not referenced by any block are dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::frame::{to_float, FeatureFrame};
use super::{ArtifactError, PredictError};

/// Preprocessing stage made of named column blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub transformers: Vec<ColumnBlock>,
}

/// A set of input columns sharing one encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnBlock {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(flatten)]
    pub encoder: Encoder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Encoder {
    /// `(x - mean) / scale`, per column
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
    /// One indicator per known category; unknown values encode as all zeros
    OneHot { categories: Vec<Vec<Value>> },
    /// Numeric value as-is
    Passthrough,
}

impl ColumnTransformer {
    /// Structural checks run once when the artifact is loaded.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        for block in &self.transformers {
            let n = block.columns.len();
            match &block.encoder {
                Encoder::StandardScaler { mean, scale } => {
                    if mean.len() != n || scale.len() != n {
                        return Err(ArtifactError::Invalid(format!(
                            "block '{}': {} columns but {} means and {} scales",
                            block.name, n, mean.len(), scale.len()
                        )));
                    }
                    if scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                        return Err(ArtifactError::Invalid(format!(
                            "block '{}': scale must be finite and non-zero",
                            block.name
                        )));
                    }
                }
                Encoder::OneHot { categories } => {
                    if categories.len() != n {
                        return Err(ArtifactError::Invalid(format!(
                            "block '{}': {} columns but {} category lists",
                            block.name, n, categories.len()
                        )));
                    }
                }
                Encoder::Passthrough => {}
            }
        }
        Ok(())
    }

    /// Width of the transformed vector
    pub fn n_features_out(&self) -> usize {
        self.transformers
            .iter()
            .map(|block| match &block.encoder {
                Encoder::OneHot { categories } => categories.iter().map(Vec::len).sum(),
                _ => block.columns.len(),
            })
            .sum()
    }

    /// Output feature names, `<block>__<column>` or `<block>__<column>_<category>`
    pub fn feature_names_out(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.n_features_out());

        for block in &self.transformers {
            match &block.encoder {
                Encoder::OneHot { categories } => {
                    for (column, cats) in block.columns.iter().zip(categories) {
                        for cat in cats {
                            names.push(format!("{}__{}_{}", block.name, column, category_label(cat)));
                        }
                    }
                }
                _ => {
                    for column in &block.columns {
                        names.push(format!("{}__{}", block.name, column));
                    }
                }
            }
        }

        names
    }

    /// Every input column referenced by some block, in block order
    pub fn input_columns(&self) -> impl Iterator<Item = &str> {
        self.transformers
            .iter()
            .flat_map(|block| block.columns.iter().map(String::as_str))
    }

    pub fn transform(&self, frame: &FeatureFrame) -> Result<Vec<f64>, PredictError> {
        let missing: Vec<&str> = self
            .input_columns()
            .filter(|column| !frame.contains(column))
            .collect();
        if !missing.is_empty() {
            return Err(PredictError::MissingColumns(missing.join(", ")));
        }

        let mut out = Vec::with_capacity(self.n_features_out());

        for block in &self.transformers {
            match &block.encoder {
                Encoder::StandardScaler { mean, scale } => {
                    for (i, column) in block.columns.iter().enumerate() {
                        let x = frame.numeric(column)?;
                        out.push((x - mean[i]) / scale[i]);
                    }
                }
                Encoder::OneHot { categories } => {
                    for (column, cats) in block.columns.iter().zip(categories) {
                        let value = frame
                            .get(column)
                            .ok_or_else(|| PredictError::MissingColumns(column.clone()))?;
                        out.extend(cats.iter().map(|cat| {
                            if same_category(cat, value) { 1.0 } else { 0.0 }
                        }));
                    }
                }
                Encoder::Passthrough => {
                    for column in &block.columns {
                        let value = frame
                            .get(column)
                            .ok_or_else(|| PredictError::MissingColumns(column.clone()))?;
                        out.push(to_float(column, value)?);
                    }
                }
            }
        }

        Ok(out)
    }
}

fn category_label(cat: &Value) -> String {
    match cat {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers compare by value (so `23` matches `23.0`), everything else structurally.
fn same_category(cat: &Value, value: &Value) -> bool {
    match (cat, value) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}
