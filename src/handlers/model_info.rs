//! Model description handler

use axum::{extract::State, Json};
use serde_json::Value;

use crate::artifacts::{StaticDocument, MODEL_INFO_FILE};
use crate::{AppError, AppResult, AppState};

/// Serve `model_info.json` verbatim
pub async fn get(State(state): State<AppState>) -> AppResult<Json<Value>> {
    match state.store.read_model_info().await {
        StaticDocument::Found(info) => Ok(Json(info)),
        StaticDocument::Missing => Err(AppError::MissingStaticFile(MODEL_INFO_FILE.to_string())),
        StaticDocument::Malformed(e) => {
            tracing::error!("Cannot parse {}: {}", MODEL_INFO_FILE, e);
            Err(AppError::InvalidStaticFile(MODEL_INFO_FILE.to_string()))
        }
    }
}
