//! Prediction handler

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::models::{PredictRequest, PredictResponse};
use crate::{AppResult, AppState};

/// Score one feature mapping.
///
/// A missing model is not an error: the response carries
/// `model_ready = false` so clients can render an unavailable state.
/// Scoring failures map to 400 via [`crate::AppError::PredictionFailed`].
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = body?;
    let prediction = state.model.predict(req.features)?;

    if prediction.model_ready {
        tracing::debug!(
            "Prediction: proba={:.4} label={} threshold={}",
            prediction.proba,
            prediction.label,
            prediction.threshold
        );
    }

    Ok(Json(prediction.into()))
}
