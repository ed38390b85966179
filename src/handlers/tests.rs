//! Router tests
//!
//! Each test builds the full router over a temporary artifact directory and
//! drives it with `oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::artifacts::{
    ArtifactStore, METRICS_AFTER_FILE, METRICS_BEFORE_FILE, MODEL_FILE, MODEL_INFO_FILE, THRESHOLD_FILE,
};
use crate::{create_router, AppState};

/// logit(0.73): with every input at its mean the calibrated output is 0.73
const LOGIT_073: f64 = 0.994_622_575_144_061_9;

fn calibrated_artifact() -> Value {
    json!({
        "version": "2024.11-cal",
        "created_at": "2024-11-02T10:00:00Z",
        "model": {
            "kind": "calibrated",
            "calibrators": [{"a": -1.0, "b": -LOGIT_073}],
            "base": {
                "kind": "pipeline",
                "steps": [
                    {"name": "pre", "type": "column_transformer", "transformers": [
                        {"name": "num", "type": "standard_scaler",
                         "columns": ["BMI", "Service time"], "mean": [25.0, 10.0], "scale": [4.0, 5.0]},
                        {"name": "cat", "type": "one_hot",
                         "columns": ["Seasons"], "categories": [[1, 2, 3, 4]]}
                    ]},
                    {"name": "clf", "type": "logistic_regression",
                     "coef": [0.8, -0.3, 0.0, 0.0, 0.0, 0.0], "intercept": 0.0}
                ]
            }
        }
    })
}

struct Fixture {
    _dir: TempDir,
    app: Router,
}

fn fixture(files: &[(&str, Value)]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    let statics = dir.path().join("static");
    std::fs::create_dir_all(&artifacts).unwrap();
    std::fs::create_dir_all(&statics).unwrap();

    for (name, content) in files {
        let target = if *name == MODEL_INFO_FILE { &statics } else { &artifacts };
        std::fs::write(target.join(name), serde_json::to_vec(content).unwrap()).unwrap();
    }

    let state = AppState::load(ArtifactStore::new(artifacts, statics));
    Fixture {
        _dir: dir,
        app: create_router(state),
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn sample_features() -> Value {
    json!({"BMI": 25.0, "Service time": 10, "Seasons": 2, "Son": 1})
}

#[tokio::test]
async fn test_health_without_model() {
    let fx = fixture(&[]);
    let (status, body) = get(&fx.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_ready"], false);
}

#[tokio::test]
async fn test_health_with_model() {
    let fx = fixture(&[(MODEL_FILE, calibrated_artifact())]);
    let (status, body) = get(&fx.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_ready"], true);
}

#[tokio::test]
async fn test_predict_without_model_is_not_ready() {
    let fx = fixture(&[]);

    for features in [json!({}), sample_features(), json!({"Age": 50, "anything": "x"})] {
        let (status, body) = post_json(&fx.app, "/predict", json!({"features": features})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_ready"], false);
        assert_eq!(body["proba"], 0.0);
        assert_eq!(body["label"], 0);
        assert_eq!(body["explanations"], json!(["Model not loaded. Add artifacts."]));
    }
}

#[tokio::test]
async fn test_corrupt_model_keeps_serving() {
    let fx = fixture(&[(MODEL_FILE, json!({"version": "1", "model": {"kind": "pipeline", "steps": []}}))]);

    let (status, body) = get(&fx.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_ready"], false);
}

#[tokio::test]
async fn test_predict_calibrated_scenario() {
    let fx = fixture(&[
        (MODEL_FILE, calibrated_artifact()),
        (THRESHOLD_FILE, json!({"threshold": 0.5})),
    ]);

    let (status, body) = post_json(&fx.app, "/predict", json!({"features": sample_features()})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_ready"], true);
    assert!((body["proba"].as_f64().unwrap() - 0.73).abs() < 1e-9);
    assert_eq!(body["label"], 1);
    assert_eq!(body["threshold"], 0.5);
    assert_eq!(body["calibrated"], true);
    assert_eq!(
        body["explanations"],
        json!(["num__BMI ↑ (impact)", "num__Service time ↓ (impact)", "cat__Seasons_1 ↓ (impact)"])
    );
}

#[tokio::test]
async fn test_predict_label_respects_custom_threshold() {
    let fx = fixture(&[
        (MODEL_FILE, calibrated_artifact()),
        (THRESHOLD_FILE, json!({"threshold": 0.8})),
    ]);

    let (_, body) = post_json(&fx.app, "/predict", json!({"features": sample_features()})).await;
    assert_eq!(body["threshold"], 0.8);
    assert_eq!(body["label"], 0);
}

#[tokio::test]
async fn test_malformed_threshold_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(MODEL_FILE), serde_json::to_vec(&calibrated_artifact()).unwrap()).unwrap();
    std::fs::write(dir.path().join(THRESHOLD_FILE), "threshold=0.9").unwrap();
    let app = create_router(AppState::load(ArtifactStore::new(dir.path(), dir.path())));

    let (_, body) = post_json(&app, "/predict", json!({"features": sample_features()})).await;
    assert_eq!(body["threshold"], 0.5);
}

#[tokio::test]
async fn test_predict_empty_features_is_bad_request() {
    let fx = fixture(&[(MODEL_FILE, calibrated_artifact())]);

    let (status, body) = post_json(&fx.app, "/predict", json!({"features": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Prediction failed"));

    // The failure does not affect the next request
    let (status, _) = post_json(&fx.app, "/predict", json!({"features": sample_features()})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_predict_non_numeric_value_is_bad_request() {
    let fx = fixture(&[(MODEL_FILE, calibrated_artifact())]);

    let mut features = sample_features();
    features["BMI"] = json!("heavy");
    let (status, body) = post_json(&fx.app, "/predict", json!({"features": features})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().starts_with("Prediction failed: "));
}

#[tokio::test]
async fn test_age_is_dropped_before_scoring() {
    let fx = fixture(&[(MODEL_FILE, calibrated_artifact())]);

    let (_, without) = post_json(&fx.app, "/predict", json!({"features": sample_features()})).await;

    for key in ["age", "Age", "AGE"] {
        let mut features = sample_features();
        features[key] = json!(58);
        let (status, with) = post_json(&fx.app, "/predict", json!({"features": features})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(with, without);
    }
}

#[tokio::test]
async fn test_metrics_without_files() {
    let fx = fixture(&[]);
    let (status, body) = get(&fx.app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"overall_before": {}, "overall_after": {}, "fairness_before": {}, "fairness_after": {}})
    );
}

#[tokio::test]
async fn test_metrics_split() {
    let fx = fixture(&[
        (METRICS_BEFORE_FILE, json!({"acc": 0.79, "f1": 0.61, "SPD": 0.21, "EOD": 0.18, "n": 740})),
        (METRICS_AFTER_FILE, json!({"acc": 0.77, "auc": 0.84, "SPD": 0.04, "FPR_diff": 0.02})),
    ]);
    let (status, body) = get(&fx.app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall_before"], json!({"acc": 0.79, "f1": 0.61}));
    assert_eq!(body["fairness_before"], json!({"SPD": 0.21, "EOD": 0.18}));
    assert_eq!(body["overall_after"], json!({"acc": 0.77, "auc": 0.84}));
    assert_eq!(body["fairness_after"], json!({"SPD": 0.04, "FPR_diff": 0.02}));
}

#[tokio::test]
async fn test_model_info_missing_is_server_error() {
    let fx = fixture(&[]);
    let (status, body) = get(&fx.app, "/model-info").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "model_info.json missing");
}

#[tokio::test]
async fn test_model_info_passthrough() {
    let info = json!({
        "purpose": "Flag employees at higher risk of frequent absence",
        "intended_user": "HR partners",
        "decision_supported": "Prioritise supportive check-ins",
        "fairness": {"protected_attribute": "Age (>=40)", "mitigations": ["drop_age_feature"]}
    });
    let fx = fixture(&[(MODEL_INFO_FILE, info.clone())]);
    let (status, body) = get(&fx.app, "/model-info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, info);
}

#[tokio::test]
async fn test_malformed_body_reports_detail() {
    let fx = fixture(&[(MODEL_FILE, calibrated_artifact())]);

    let (status, body) = post_json(&fx.app, "/predict", json!({"inputs": {}})).await;
    assert!(status.is_client_error());
    assert!(body["detail"].as_str().unwrap().contains("features"));
}
