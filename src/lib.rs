//! # Customer Analyzer
//!
//! Client for an e-commerce customer classification service. Collects
//! customer attributes in a form, sends them to a remote `/predict`
//! endpoint, and keeps a persisted history of results with per-label
//! summaries.
//!
//! ## Modules
//!
//! - [`form`]: raw form input and sample presets
//! - [`record`]: parse-and-validate into a typed [`CustomerRecord`]
//! - [`predictor`]: HTTP client for the prediction service
//! - [`history`]: persisted, append-only prediction history
//! - [`summary`]: per-label counts and chart series
//! - [`session`]: one running client, with a single-slot request gate
//! - [`view`]: terminal rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use customer_analyzer::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let predictor = HttpPredictor::new(ClientConfig::default())?;
//!     let history = HistoryStore::load(Arc::new(FileStore::open("./data")?));
//!     let session = Session::new(Arc::new(predictor), history);
//!
//!     session.apply_preset(Preset::Fraud).await;
//!     let result = session.submit().await?;
//!     println!("{} ({:?}%)", result.label, result.confidence);
//!
//!     let summary = session.summary().await;
//!     println!("fraudulent so far: {}", summary.fraudulent);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod form;
pub mod history;
pub mod logging;
pub mod predictor;
pub mod record;
pub mod session;
pub mod summary;
pub mod view;

// Re-export top-level types for convenience
pub use form::{Field, FormState, Preset};

pub use record::{CustomerRecord, FieldError, ValidationErrors};

pub use predictor::{
    ClientConfig, HttpPredictor, Label, PredictError, PredictionResult, PredictionService,
    UnknownLabel,
};

pub use history::{
    ExportFormat, FileStore, HistoryEntry, HistoryError, HistoryResult, HistoryStore,
    KeyValueStore, MemoryStore,
};

pub use summary::{summarize, ChartPoint, SummaryCount};

pub use session::{RequestState, Session, SubmitError, PREDICTION_FAILED_MESSAGE};

pub use view::Theme;

pub use config::{Config, ConfigError, HistoryConfig, LoggingConfig, PredictorConfig};
