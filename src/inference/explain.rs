//! Explanation Generator
//!
//! Ranks linear coefficients by magnitude. Purely cosmetic: callers go
//! through [`explanations_or_fallback`], which never fails.

use super::artifact::LoadedModel;
use super::ExplainError;

/// Number of features reported
pub const TOP_FEATURES: usize = 3;

pub const NO_COEFFICIENTS: &str = "Model coefficients not available.";
pub const UNAVAILABLE: &str = "Explanations unavailable; showing probability only.";

/// Rank the top features of a model by absolute coefficient.
pub fn explain(model: &LoadedModel) -> Result<Vec<String>, ExplainError> {
    let Some(coefs) = model.classifier().coefficients() else {
        return Ok(vec![NO_COEFFICIENTS.to_string()]);
    };

    let names = match model.preprocessor() {
        Some(pre) => pre.feature_names_out(),
        None => synthetic_names(coefs.len()),
    };

    rank(&names, coefs)
}

/// Explanations for a response; any failure becomes the static fallback.
pub fn explanations_or_fallback(model: &LoadedModel) -> Vec<String> {
    explain(model).unwrap_or_else(|e| {
        tracing::debug!("Explanation skipped: {}", e);
        vec![UNAVAILABLE.to_string()]
    })
}

fn synthetic_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("f{}", i)).collect()
}

fn rank(names: &[String], coefs: &[f64]) -> Result<Vec<String>, ExplainError> {
    if names.len() != coefs.len() {
        return Err(ExplainError::LengthMismatch {
            names: names.len(),
            coefs: coefs.len(),
        });
    }

    let mut order: Vec<usize> = (0..coefs.len()).collect();
    order.sort_by(|&a, &b| coefs[b].abs().total_cmp(&coefs[a].abs()));

    Ok(order
        .into_iter()
        .take(TOP_FEATURES)
        .map(|i| {
            let direction = if coefs[i] > 0.0 { "↑" } else { "↓" };
            format!("{} {} (impact)", names[i], direction)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(model: serde_json::Value) -> LoadedModel {
        let bytes = serde_json::to_vec(&json!({"version": "test", "model": model})).unwrap();
        LoadedModel::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_rank_by_magnitude_with_direction() {
        let names: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let out = rank(&names, &[0.1, -3.0, 2.0, -0.5]).unwrap();
        assert_eq!(out, vec!["b ↓ (impact)", "c ↑ (impact)", "d ↓ (impact)"]);
    }

    #[test]
    fn test_rank_fewer_than_three() {
        let names = vec!["only".to_string()];
        assert_eq!(rank(&names, &[1.0]).unwrap(), vec!["only ↑ (impact)"]);
    }

    #[test]
    fn test_rank_length_mismatch_is_error() {
        let names = vec!["a".to_string()];
        assert!(matches!(
            rank(&names, &[1.0, 2.0]),
            Err(ExplainError::LengthMismatch { names: 1, coefs: 2 })
        ));
    }

    #[test]
    fn test_names_from_preprocessor() {
        let model = load(json!({
            "kind": "pipeline",
            "steps": [
                {"name": "pre", "type": "column_transformer", "transformers": [
                    {"name": "num", "type": "standard_scaler", "columns": ["BMI", "Son"],
                     "mean": [0.0, 0.0], "scale": [1.0, 1.0]}
                ]},
                {"name": "clf", "type": "logistic_regression", "coef": [0.2, -0.9], "intercept": 0.0}
            ]
        }));

        assert_eq!(
            explanations_or_fallback(&model),
            vec!["num__Son ↓ (impact)", "num__BMI ↑ (impact)"]
        );
    }

    #[test]
    fn test_synthetic_names_without_preprocessor() {
        let model = load(json!({
            "kind": "estimator",
            "estimator": {"type": "logistic_regression", "coef": [0.5, 0.0, -2.0, 1.0], "intercept": 0.0}
        }));

        assert_eq!(
            explanations_or_fallback(&model),
            vec!["f2 ↓ (impact)", "f3 ↑ (impact)", "f0 ↑ (impact)"]
        );
    }

    #[test]
    fn test_prior_has_static_message() {
        let model = load(json!({
            "kind": "estimator",
            "estimator": {"type": "prior", "positive_prior": 0.4}
        }));

        assert_eq!(explanations_or_fallback(&model), vec![NO_COEFFICIENTS]);
    }

    #[test]
    fn test_mismatched_preprocessor_falls_back() {
        // Preprocessor emits two columns, classifier holds three weights.
        let model = load(json!({
            "kind": "pipeline",
            "steps": [
                {"name": "pre", "type": "column_transformer", "transformers": [
                    {"name": "num", "type": "passthrough", "columns": ["a", "b"]}
                ]},
                {"name": "clf", "type": "logistic_regression", "coef": [1.0, 2.0, 3.0], "intercept": 0.0}
            ]
        }));

        assert_eq!(explanations_or_fallback(&model), vec![UNAVAILABLE]);
    }
}
