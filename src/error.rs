//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use axum::extract::rejection::JsonRejection;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request errors
    InvalidBody(JsonRejection),
    PredictionFailed(String),

    // Deployment errors
    MissingStaticFile(String),
    InvalidStaticFile(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
            AppError::PredictionFailed(msg) => {
                tracing::warn!("Prediction failed: {}", msg);
                (StatusCode::BAD_REQUEST, format!("Prediction failed: {}", msg))
            }
            AppError::MissingStaticFile(name) => {
                tracing::error!("Static file missing: {}", name);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{} missing", name))
            }
            AppError::InvalidStaticFile(name) => {
                tracing::error!("Static file is not valid JSON: {}", name);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{} is not valid JSON", name))
            }
        };

        let body = Json(json!({
            "detail": detail,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<crate::inference::PredictError> for AppError {
    fn from(err: crate::inference::PredictError) -> Self {
        AppError::PredictionFailed(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}
