//! Dashboard Client
//!
//! Stateless terminal client for the inference service. Each view issues
//! its requests, then renders; backend failures become messages, never
//! panics.

pub mod client;
pub mod form;
pub mod render;

pub use client::{ClientConfig, ClientError, DashboardClient};
pub use form::EmployeeInput;

/// Prediction view for one employee
pub async fn prediction_view(client: &DashboardClient, input: &EmployeeInput) -> String {
    tracing::debug!("Requesting prediction from {}", client.backend_url());

    let result = client.predict(input.to_features()).await;
    if let Err(e) = &result {
        tracing::warn!("Prediction request failed: {}", e);
    }

    format!("Employee: {}\n\n{}", input.describe(), render::prediction(&result))
}

/// Health, performance, model details and fairness panels
pub async fn overview_view(client: &DashboardClient) -> String {
    let (health, info, metrics) = tokio::join!(client.health(), client.model_info(), client.metrics());

    let info = info
        .map_err(|e| tracing::warn!("Model info unavailable: {}", e))
        .ok();
    let metrics = metrics
        .map_err(|e| tracing::warn!("Metrics unavailable: {}", e))
        .ok();

    [
        render::health(&health),
        render::performance(metrics.as_ref()),
        render::overview(info.as_ref()),
        render::fairness(info.as_ref(), metrics.as_ref()),
    ]
    .join("\n")
}
