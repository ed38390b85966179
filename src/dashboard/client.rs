//! HTTP client for the inference service

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{ErrorBody, HealthResponse, MetricsReport, ModelInfo, PredictRequest, PredictResponse};

/// Default backend address
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not contact backend at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{detail}")]
    Api { status: u16, detail: String },

    #[error("unexpected response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub predict_timeout: Duration,
    pub overview_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            predict_timeout: Duration::from_secs(10),
            overview_timeout: Duration::from_secs(5),
        }
    }
}

pub struct DashboardClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl DashboardClient {
    pub fn new(config: ClientConfig) -> Self {
        let backend_url = config.backend_url.trim_end_matches('/').to_string();

        // Local backends bypass any system proxy
        let mut builder = reqwest::Client::builder();
        if is_loopback(&backend_url) {
            builder = builder.no_proxy();
        }
        let http_client = builder.build().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });

        Self {
            config: ClientConfig { backend_url, ..config },
            http_client,
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.config.backend_url
    }

    pub async fn predict(&self, features: Map<String, Value>) -> Result<PredictResponse, ClientError> {
        let url = format!("{}/predict", self.config.backend_url);
        let resp = self
            .http_client
            .post(&url)
            .timeout(self.config.predict_timeout)
            .json(&PredictRequest { features })
            .send()
            .await
            .map_err(|source| ClientError::Unreachable { url: self.config.backend_url.clone(), source })?;

        decode(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json("/health").await
    }

    pub async fn model_info(&self) -> Result<ModelInfo, ClientError> {
        self.get_json("/model-info").await
    }

    pub async fn metrics(&self) -> Result<MetricsReport, ClientError> {
        self.get_json("/metrics").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.config.backend_url, path);
        let resp = self
            .http_client
            .get(&url)
            .timeout(self.config.overview_timeout)
            .send()
            .await
            .map_err(|source| ClientError::Unreachable { url: self.config.backend_url.clone(), source })?;

        decode(resp).await
    }
}

/// Success bodies decode into `T`; failures surface the server's `detail`.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    if resp.status().is_success() {
        return resp.json().await.map_err(ClientError::Decode);
    }

    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status,
        detail: error_detail(&text),
    })
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}

/// `detail` from a JSON error body, else the raw text
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| body.to_string())
}
