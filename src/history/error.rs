//! History store error types

use thiserror::Error;

/// Errors that can occur while persisting prediction history
#[derive(Error, Debug)]
pub enum HistoryError {
    /// I/O operation on the backing store failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Serialization(err.to_string())
    }
}

/// Result type alias for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
