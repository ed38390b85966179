//! Decision Threshold
//!
//! Probability cutoff for the positive label, read once from a side-car
//! file. Anything unusable falls back to the default.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

/// Cutoff used when the side-car file is absent or unusable
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecisionThreshold(f64);

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl DecisionThreshold {
    /// Accepts finite values in `[0, 1]`
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(Self(value))
    }

    /// Parse `{"threshold": <float>}`; numeric strings are accepted.
    pub fn from_json(raw: &str) -> Option<Self> {
        let doc: Value = serde_json::from_str(raw).ok()?;
        let value = match doc.get("threshold")? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        Self::new(value)
    }

    /// Load from disk, defaulting on absence or parse error.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                tracing::debug!("No threshold file at {}, using {}", path.display(), DEFAULT_THRESHOLD);
                return Self::default();
            }
        };

        Self::from_json(&raw).unwrap_or_else(|| {
            tracing::debug!("Unusable threshold file {}, using {}", path.display(), DEFAULT_THRESHOLD);
            Self::default()
        })
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// 1 iff `proba >= threshold`
    pub fn label(&self, proba: f64) -> u8 {
        u8::from(proba >= self.0)
    }
}
