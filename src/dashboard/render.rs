//! Text rendering for dashboard panels
//!
//! Every panel renders from an `Option` or `Result` so a failed fetch turns
//! into a placeholder instead of aborting the whole view.

use std::fmt::Write;

use serde_json::{Map, Value};

use super::client::ClientError;
use crate::models::{HealthResponse, MetricsReport, ModelInfo, PredictResponse};

const RULE: &str = "----------------------------------------------------------------";

pub const DEFAULT_PROTECTED_ATTRIBUTE: &str = "Age (≥40)";

/// Readable text for mitigation identifiers
pub fn mitigation_label(id: &str) -> &str {
    match id {
        "drop_age_feature" => "Removed age from inputs",
        "reweight_by_AxY" => "Balanced training data",
        "probability_calibration" => "Calibrated predictions for fairness",
        other => other,
    }
}

/// Readable names for fairness metrics
pub fn fairness_label(key: &str) -> &str {
    match key {
        "SPD" => "Parity gap",
        "EOD" => "TPR gap",
        "FPR_diff" => "False alert gap",
        other => other,
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

fn metric(map: &Map<String, Value>, key: &str) -> f64 {
    map.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Outcome of a `/predict` call
pub fn prediction(result: &Result<PredictResponse, ClientError>) -> String {
    let mut out = String::new();

    match result {
        Ok(p) if !p.model_ready => {
            let _ = writeln!(out, "[!] Model not available on the backend.");
            for line in &p.explanations {
                let _ = writeln!(out, "    {}", line);
            }
        }
        Ok(p) => {
            let proba = format!("{:.1}%", p.proba * 100.0);
            if p.label == 1 {
                let _ = writeln!(out, "[HIGH RISK] {} probability", proba);
                let _ = writeln!(
                    out,
                    "This employee is more likely to be frequently absent. Consider supportive \
                     outreach (check-in, workload review, wellbeing resources)."
                );
            } else {
                let _ = writeln!(out, "[LOW RISK] {} probability", proba);
                let _ = writeln!(out, "Attendance looks stable. No immediate action suggested from the model.");
            }
            let _ = writeln!(out, "Decision cutoff (model threshold): {}", percent(p.threshold));
            let _ = writeln!(out, "Predictions with probability at or above the cutoff are labelled High risk.");
            if p.calibrated {
                let _ = writeln!(out, "Probabilities are calibrated.");
            }
            if !p.explanations.is_empty() {
                let _ = writeln!(out, "Top factors:");
                for line in &p.explanations {
                    let _ = writeln!(out, "  - {}", line);
                }
            }
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(
                out,
                "Note: this is a predictive signal, not a decision. Combine with HR context and review before action."
            );
        }
        Err(e @ ClientError::Unreachable { .. }) => {
            let _ = writeln!(out, "[!] {}", e);
        }
        Err(e) => {
            let _ = writeln!(out, "Prediction failed: {}", strip_prefix(&e.to_string()));
        }
    }

    out
}

/// The server already prefixes its detail; avoid printing it twice.
fn strip_prefix(detail: &str) -> &str {
    detail.strip_prefix("Prediction failed: ").unwrap_or(detail)
}

pub fn health(result: &Result<HealthResponse, ClientError>) -> String {
    match result {
        Ok(h) if h.model_ready => format!("Backend {} (v{}), model ready\n", h.status, h.version),
        Ok(h) => format!("Backend {} (v{}), model NOT loaded\n", h.status, h.version),
        Err(e) => format!("[!] Backend unavailable: {}\n", e),
    }
}

/// "How well does the model perform?"
pub fn performance(metrics: Option<&MetricsReport>) -> String {
    let mut out = String::from("How well does the model perform?\n");

    match metrics {
        Some(m) if !m.overall_before.is_empty() && !m.overall_after.is_empty() => {
            let after = &m.overall_after;
            let _ = writeln!(out, "  The model predicts correctly about {} of the time.", percent(metric(after, "acc")));
            let _ = writeln!(out, "  It balances errors with an overall stability (F1) of {}.", percent(metric(after, "f1")));
            let _ = writeln!(
                out,
                "  It distinguishes high-risk vs low-risk employees correctly about {} of the time.",
                percent(metric(after, "auc"))
            );
        }
        _ => out.push_str("  Performance information is not available for this deployment.\n"),
    }

    out
}

/// "Model overview"
pub fn overview(info: Option<&ModelInfo>) -> String {
    let mut out = String::from("Model overview\n");

    match info {
        Some(i) => {
            let _ = writeln!(out, "  Purpose: {}", i.purpose);
            let _ = writeln!(out, "  Intended user: {}", i.intended_user);
            let _ = writeln!(out, "  Decision supported: {}", i.decision_supported);
            out.push_str("  This tool should not be used for hiring, firing, or disciplinary action.\n");
        }
        None => out.push_str("  Model information is not available.\n"),
    }

    out
}

/// "Fairness & transparency"
pub fn fairness(info: Option<&ModelInfo>, metrics: Option<&MetricsReport>) -> String {
    let mut out = String::from("Fairness & transparency\n");

    let protected = info
        .and_then(|i| i.fairness.protected_attribute.as_deref())
        .unwrap_or(DEFAULT_PROTECTED_ATTRIBUTE);
    let _ = writeln!(out, "  Protected attribute: {}", protected);

    let mitigations = info.map(|i| i.fairness.mitigations.as_slice()).unwrap_or_default();
    out.push_str("  What we did to reduce bias:\n");
    for m in mitigations {
        let _ = writeln!(out, "    - {}", mitigation_label(m));
    }

    match metrics.map(|m| &m.fairness_after) {
        Some(after) if !after.is_empty() => {
            out.push_str("  Fairness after mitigation:\n");
            for (key, value) in after {
                let shown = value
                    .as_f64()
                    .map(|v| format!("{:.3}", v))
                    .unwrap_or_else(|| value.to_string());
                let _ = writeln!(out, "    {}: {}", fairness_label(key), shown);
            }
            out.push_str("  Closer to 0 means fairer between groups.\n");
        }
        _ => out.push_str("  Fairness metrics not available.\n"),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(proba: f64, label: u8) -> PredictResponse {
        PredictResponse {
            proba,
            label,
            threshold: 0.5,
            calibrated: true,
            explanations: vec!["num__BMI ↑ (impact)".to_string()],
            model_ready: true,
        }
    }

    #[test]
    fn test_high_and_low_risk_headlines() {
        let high = prediction(&Ok(response(0.73, 1)));
        assert!(high.starts_with("[HIGH RISK] 73.0% probability"));
        assert!(high.contains("Decision cutoff (model threshold): 50%"));
        assert!(high.contains("  - num__BMI ↑ (impact)"));

        let low = prediction(&Ok(response(0.12, 0)));
        assert!(low.starts_with("[LOW RISK] 12.0% probability"));
    }

    #[test]
    fn test_not_ready_prediction() {
        let p = PredictResponse {
            proba: 0.0,
            label: 0,
            threshold: 0.5,
            calibrated: false,
            explanations: vec!["Model not loaded. Add artifacts.".to_string()],
            model_ready: false,
        };
        let out = prediction(&Ok(p));
        assert!(out.contains("Model not available"));
        assert!(!out.contains("RISK"));
    }

    #[test]
    fn test_api_error_shows_detail_once() {
        let err = ClientError::Api {
            status: 400,
            detail: "Prediction failed: columns are missing: BMI".to_string(),
        };
        assert_eq!(prediction(&Err(err)), "Prediction failed: columns are missing: BMI\n");
    }

    #[test]
    fn test_performance_needs_both_snapshots() {
        let mut report = MetricsReport::default();
        report.overall_after = json!({"acc": 0.81, "f1": 0.66, "auc": 0.9}).as_object().cloned().unwrap();
        assert!(performance(Some(&report)).contains("not available"));

        report.overall_before = json!({"acc": 0.8}).as_object().cloned().unwrap();
        let out = performance(Some(&report));
        assert!(out.contains("about 81% of the time"));
        assert!(out.contains("(F1) of 66%"));
        assert!(out.contains("correctly about 90% of the time"));

        assert!(performance(None).contains("not available"));
    }

    #[test]
    fn test_fairness_panel() {
        let info: ModelInfo = serde_json::from_value(json!({
            "fairness": {"mitigations": ["drop_age_feature", "custom_step"]}
        }))
        .unwrap();
        let mut report = MetricsReport::default();
        report.fairness_after = json!({"SPD": 0.04213, "FPR_diff": -0.01}).as_object().cloned().unwrap();

        let out = fairness(Some(&info), Some(&report));
        assert!(out.contains("Protected attribute: Age (≥40)"));
        assert!(out.contains("- Removed age from inputs"));
        assert!(out.contains("- custom_step"));
        assert!(out.contains("Parity gap: 0.042"));
        assert!(out.contains("False alert gap: -0.010"));
    }

    #[test]
    fn test_panels_degrade_independently() {
        assert!(overview(None).contains("not available"));
        assert!(fairness(None, None).contains("Fairness metrics not available"));
    }
}
