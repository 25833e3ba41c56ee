//! Persisted prediction history

use std::io;
use std::sync::Arc;

use super::error::HistoryResult;
use super::kv::KeyValueStore;
use crate::predictor::PredictionResult;

/// A retained prediction, in submission order
pub type HistoryEntry = PredictionResult;

/// Default slot name for the history sequence
pub const DEFAULT_HISTORY_KEY: &str = "history";

/// Ordered, append-only list of past predictions mirrored to a durable slot
///
/// Every mutating call writes the full sequence (overwrite, not incremental)
/// before touching memory, so once a call returns the persisted copy and the
/// in-memory copy are equal. A failed write leaves both unchanged.
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Load the persisted sequence under the default key
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::load_key(kv, DEFAULT_HISTORY_KEY)
    }

    /// Load the persisted sequence stored under `key`
    ///
    /// A missing slot starts an empty history. An unreadable or malformed
    /// slot also starts empty, with a warning; the bad value stays on disk
    /// until the next append or clear replaces it.
    pub fn load_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let entries = match kv.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Stored history is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Stored history is unreadable, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(key = %key, entries = entries.len(), "Loaded prediction history");

        Self { kv, key, entries }
    }

    /// Add one entry at the end and persist the whole sequence
    pub fn append(&mut self, entry: HistoryEntry) -> HistoryResult<()> {
        self.entries.push(entry);

        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }

        tracing::debug!(key = %self.key, entries = self.entries.len(), "Appended history entry");
        Ok(())
    }

    /// [`append`](Self::append) for async callers
    ///
    /// Each append rewrites the whole sequence, so the write runs on the
    /// blocking pool instead of the runtime's worker thread.
    pub async fn append_async(&mut self, entry: HistoryEntry) -> HistoryResult<()> {
        self.entries.push(entry);

        let written = match serde_json::to_string(&self.entries) {
            Ok(raw) => {
                let kv = Arc::clone(&self.kv);
                let key = self.key.clone();
                tokio::task::spawn_blocking(move || kv.set(&key, &raw))
                    .await
                    .unwrap_or_else(|e| Err(io::Error::new(io::ErrorKind::Other, e).into()))
            }
            Err(e) => Err(e.into()),
        };

        if let Err(e) = written {
            self.entries.pop();
            return Err(e);
        }

        tracing::debug!(key = %self.key, entries = self.entries.len(), "Appended history entry");
        Ok(())
    }

    /// Forget every entry and remove the persisted slot
    pub fn clear(&mut self) -> HistoryResult<()> {
        self.kv.remove(&self.key)?;
        self.entries.clear();

        tracing::info!(key = %self.key, "Cleared prediction history");
        Ok(())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn persist(&self) -> HistoryResult<()> {
        let raw = serde_json::to_string(&self.entries)?;
        self.kv.set(&self.key, &raw)
    }
}
