//! Absenteeism risk inference service
//!
//! Serves a pre-trained binary classifier over HTTP and ships a terminal
//! dashboard that renders its answers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   HTTP   ┌──────────────────────────────────────┐
//! │  dashboard   │ ───────▶ │  Inference Service (Axum)            │
//! │  (reqwest)   │ ◀─────── │   /health /model-info /metrics       │
//! └──────────────┘          │   /predict ─▶ ModelState (immutable) │
//!                           └──────────────────┬───────────────────┘
//!                                              ▼
//!                           ┌──────────────────────────────────────┐
//!                           │  Artifact Store (flat files)         │
//!                           └──────────────────────────────────────┘
//! ```

pub mod artifacts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

use artifacts::ArtifactStore;
use inference::ModelState;

pub use error::{AppError, AppResult};

/// Shared application state, built once at startup and never mutated
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelState>,
    pub store: Arc<ArtifactStore>,
}

impl AppState {
    pub fn new(model: ModelState, store: ArtifactStore) -> Self {
        Self {
            model: Arc::new(model),
            store: Arc::new(store),
        }
    }

    /// Load the model from the store and wrap both.
    pub fn load(store: ArtifactStore) -> Self {
        let model = store.load_model_state();
        Self::new(model, store)
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/model-info", get(handlers::model_info::get))
        .route("/metrics", get(handlers::metrics::get))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
