//! Metrics handler

use axum::{extract::State, Json};

use crate::models::MetricsReport;
use crate::AppState;

/// Before/after snapshots split into performance and fairness keys
pub async fn get(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.store.read_metrics().await)
}
