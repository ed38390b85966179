//! Single-row feature frame
//!
//! Holds one request's feature mapping by column name. Protected attributes
//! are dropped here, before any model stage sees the row.

use serde_json::{Map, Value};

use super::PredictError;

/// Protected attribute excluded from every model input.
pub const PROTECTED_ATTRIBUTE: &str = "age";

/// Whether a column name is an alias of the protected attribute.
pub fn is_protected(column: &str) -> bool {
    column.eq_ignore_ascii_case(PROTECTED_ATTRIBUTE)
}

/// One input row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFrame {
    columns: Map<String, Value>,
}

impl FeatureFrame {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self { columns }
    }

    /// Drop every column matching the protected attribute, in any casing.
    pub fn without_protected(mut self) -> Self {
        self.columns.retain(|name, _| {
            let keep = !is_protected(name);
            if !keep {
                tracing::debug!("Dropping protected column '{}'", name);
            }
            keep
        });
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Read a column as a float, the way a numeric model stage would.
    pub fn numeric(&self, column: &str) -> Result<f64, PredictError> {
        let value = self
            .columns
            .get(column)
            .ok_or_else(|| PredictError::MissingColumns(column.to_string()))?;
        to_float(column, value)
    }
}

impl From<Map<String, Value>> for FeatureFrame {
    fn from(columns: Map<String, Value>) -> Self {
        Self::new(columns)
    }
}

/// Numbers pass through, booleans become 0/1 and numeric strings are parsed.
pub fn to_float(column: &str, value: &Value) -> Result<f64, PredictError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(PredictError::NotNumeric {
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
