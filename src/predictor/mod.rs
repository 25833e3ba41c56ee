//! Prediction service integration
//!
//! The classification model lives behind a remote HTTP endpoint. This module
//! holds the result types and the client that calls it.
//!
//! ## Architecture
//!
//! - **PredictionService**: the seam the session talks to
//! - **HttpPredictor**: reqwest implementation posting JSON to `/predict`

mod client;
mod types;

pub use client::{ClientConfig, HttpPredictor, PredictError, REQUEST_ID_HEADER};
pub use types::{Label, PredictionResult, UnknownLabel};

use async_trait::async_trait;

use crate::record::CustomerRecord;

/// Something that can classify a customer record
///
/// One call is one round-trip. Implementations must not retry: a failure is
/// reported to the caller once and the submission ends there. Implementations
/// log their own failures; callers only propagate them.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult, PredictError>;
}
