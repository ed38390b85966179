//! Metric snapshots, split into performance and fairness subsets

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Overall performance keys
pub const OVERALL_KEYS: [&str; 5] = ["acc", "prec", "rec", "f1", "auc"];

/// Fairness keys across the protected attribute
pub const FAIRNESS_KEYS: [&str; 3] = ["SPD", "EOD", "FPR_diff"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub overall_before: Map<String, Value>,
    pub overall_after: Map<String, Value>,
    pub fairness_before: Map<String, Value>,
    pub fairness_after: Map<String, Value>,
}

impl MetricsReport {
    pub fn from_snapshots(before: &Map<String, Value>, after: &Map<String, Value>) -> Self {
        let (overall_before, fairness_before) = split(before);
        let (overall_after, fairness_after) = split(after);

        Self {
            overall_before,
            overall_after,
            fairness_before,
            fairness_after,
        }
    }
}

/// Keep only the known keys; anything else in the snapshot is ignored.
pub fn split(snapshot: &Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let pick = |keys: &[&str]| -> Map<String, Value> {
        snapshot
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    };

    (pick(&OVERALL_KEYS), pick(&FAIRNESS_KEYS))
}
