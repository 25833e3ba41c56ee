//! Prediction REST client
//!
//! HTTP client for the `/predict` endpoint of the classification service.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use super::types::PredictionResult;
use super::PredictionService;
use crate::record::CustomerRecord;

/// Header carrying a fresh UUID v4 per request, also recorded on the `predict` span
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Configuration for the prediction client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the prediction endpoint
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8004/predict".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// reqwest-backed [`PredictionService`]
pub struct HttpPredictor {
    client: Client,
    config: ClientConfig,
}

impl HttpPredictor {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, PredictError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl PredictionService for HttpPredictor {
    async fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult, PredictError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "predict",
            request_id = %request_id,
            endpoint = %self.config.endpoint
        );

        async {
            let outcome = self.send(record, request_id).await;
            if let Err(e) = &outcome {
                tracing::warn!(kind = e.kind(), error = %e, "Prediction failed");
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

impl HttpPredictor {
    async fn send(
        &self,
        record: &CustomerRecord,
        request_id: Uuid,
    ) -> Result<PredictionResult, PredictError> {
        tracing::debug!("Sending prediction request");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(record)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(PredictError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let result: PredictionResult =
            serde_json::from_str(&body).map_err(|e| PredictError::Decode(e.to_string()))?;

        tracing::info!(
            label = %result.label,
            confidence = ?result.confidence,
            "Prediction received"
        );

        Ok(result)
    }
}

fn classify(e: reqwest::Error) -> PredictError {
    if e.is_timeout() {
        PredictError::Timeout
    } else if e.is_connect() {
        PredictError::Unavailable
    } else {
        PredictError::Request(e)
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when calling the prediction service
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Prediction service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl PredictError {
    /// Short name of the failure kind, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Unavailable => "unavailable",
            PredictError::Request(_) => "request",
            PredictError::Api { .. } => "api",
            PredictError::Timeout => "timeout",
            PredictError::Decode(_) => "decode",
        }
    }
}
