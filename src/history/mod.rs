//! Prediction history
//!
//! An ordered record of every successful prediction, kept in memory and
//! mirrored to a durable key/value slot.
//!
//! ## Architecture
//!
//! - **KeyValueStore**: injected persistence (`FileStore` on disk, `MemoryStore` in tests)
//! - **HistoryStore**: load once, append, clear; memory and slot stay equal
//! - **export**: JSON and CSV dumps of the sequence

mod error;
mod export;
mod kv;
mod store;

pub use error::{HistoryError, HistoryResult};
pub use export::{export, ExportFormat};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use store::{HistoryEntry, HistoryStore, DEFAULT_HISTORY_KEY};
