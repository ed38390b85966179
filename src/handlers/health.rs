//! Health check handler

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::AppState;

/// Always 200; readiness is reported, not enforced.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_ready: state.model.is_ready(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
