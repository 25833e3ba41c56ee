//! Form session
//!
//! Ties the pieces together for one running client: the form being edited,
//! the request gate, the latest result, the theme and the persisted history.
//!
//! ## Submission flow
//!
//! 1. Parse and validate the form into a [`CustomerRecord`]
//! 2. Take the request gate (a second submission gets [`SubmitError::Busy`])
//! 3. Call the prediction service once
//! 4. Append the result to history, then show it
//!
//! Any failure ends the submission with history untouched, and the gate is
//! always released on the way out.

mod gate;

pub use gate::{Busy, RequestGate, RequestGuard, RequestState};

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::form::{Field, FormState, Preset};
use crate::history::{HistoryEntry, HistoryError, HistoryResult, HistoryStore};
use crate::predictor::{PredictError, PredictionResult, PredictionService};
use crate::record::{CustomerRecord, ValidationErrors};
use crate::summary::SummaryCount;
use crate::view::Theme;

/// The one message shown for any failed round-trip
pub const PREDICTION_FAILED_MESSAGE: &str = "Prediction failed. Check your backend.";

/// Why a submission did not produce a result
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    #[error("{0}")]
    Busy(#[from] Busy),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictError),

    #[error("Could not save history: {0}")]
    History(#[from] HistoryError),
}

impl SubmitError {
    /// Text for the user-facing notification
    ///
    /// Every service failure collapses to the same message; the detailed
    /// kind is only logged.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Prediction(_) => PREDICTION_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// State of one running client
pub struct Session {
    predictor: Arc<dyn PredictionService>,
    gate: RequestGate,
    form: RwLock<FormState>,
    result: RwLock<Option<PredictionResult>>,
    theme: RwLock<Theme>,
    history: RwLock<HistoryStore>,
}

impl Session {
    /// Create a session around an already loaded history
    pub fn new(predictor: Arc<dyn PredictionService>, history: HistoryStore) -> Self {
        Self {
            predictor,
            gate: RequestGate::new(),
            form: RwLock::new(FormState::new()),
            result: RwLock::new(None),
            theme: RwLock::new(Theme::default()),
            history: RwLock::new(history),
        }
    }

    // ============ Form ============

    pub async fn form(&self) -> FormState {
        self.form.read().await.clone()
    }

    pub async fn update_field(&self, field: Field, value: impl Into<String>) {
        self.form.write().await.update(field, value);
    }

    pub async fn apply_preset(&self, preset: Preset) {
        self.form.write().await.apply_preset(preset);
        tracing::debug!(preset = %preset, "Applied preset");
    }

    /// Blank every field and hide the last result
    pub async fn reset(&self) {
        self.form.write().await.reset();
        *self.result.write().await = None;
    }

    // ============ Submission ============

    /// Submit the current form, bounding `last_purchase` by the local date
    pub async fn submit(&self) -> Result<PredictionResult, SubmitError> {
        self.submit_on(Local::now().date_naive()).await
    }

    /// Submit the current form as if today were `today`
    pub async fn submit_on(&self, today: NaiveDate) -> Result<PredictionResult, SubmitError> {
        let record = {
            let form = self.form.read().await;
            CustomerRecord::parse(&form, today)?
        };

        let _pending = self.gate.try_acquire().map_err(|busy| {
            tracing::debug!("Submission rejected, request already pending");
            busy
        })?;

        // Failures are logged by the predictor, inside its request span.
        let result = self.predictor.predict(&record).await?;

        self.history
            .write()
            .await
            .append_async(result.clone())
            .await?;
        *self.result.write().await = Some(result.clone());

        Ok(result)
    }

    pub fn is_loading(&self) -> bool {
        self.gate.is_pending()
    }

    pub fn request_state(&self) -> RequestState {
        self.gate.state()
    }

    /// The result of the last successful submission, until reset
    pub async fn result(&self) -> Option<PredictionResult> {
        self.result.read().await.clone()
    }

    // ============ History ============

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.read().await.entries().to_vec()
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn clear_history(&self) -> HistoryResult<()> {
        self.history.write().await.clear()
    }

    pub async fn summary(&self) -> SummaryCount {
        SummaryCount::from_entries(self.history.read().await.entries())
    }

    // ============ Theme ============

    pub async fn theme(&self) -> Theme {
        *self.theme.read().await
    }

    /// Flip between light and dark, returning the new theme
    pub async fn toggle_theme(&self) -> Theme {
        let mut theme = self.theme.write().await;
        *theme = theme.toggled();
        *theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{KeyValueStore, MemoryStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    /// Answers every call with a fixed result and remembers what it was sent
    struct ScriptedPredictor {
        reply: fn() -> Result<PredictionResult, PredictError>,
        calls: AtomicUsize,
        last_record: Mutex<Option<CustomerRecord>>,
    }

    impl ScriptedPredictor {
        fn new(reply: fn() -> Result<PredictionResult, PredictError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_record: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl PredictionService for ScriptedPredictor {
        async fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult, PredictError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_record.lock().unwrap() = Some(record.clone());
            (self.reply)()
        }
    }

    /// Holds every call open until released
    #[derive(Default)]
    struct BlockingPredictor {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl PredictionService for BlockingPredictor {
        async fn predict(&self, _record: &CustomerRecord) -> Result<PredictionResult, PredictError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(PredictionResult::new("Loyal", Some(92.0)))
        }
    }

    fn fraudulent() -> Result<PredictionResult, PredictError> {
        Ok(PredictionResult::new("Fraudulent", Some(87.0)))
    }

    fn unreachable_service() -> Result<PredictionResult, PredictError> {
        Err(PredictError::Unavailable)
    }

    fn session_with(predictor: Arc<dyn PredictionService>) -> (Session, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        let history = HistoryStore::load(kv.clone());
        (Session::new(predictor, history), kv)
    }

    #[tokio::test]
    async fn test_successful_submission_appends_history() {
        let predictor = ScriptedPredictor::new(fraudulent);
        let (session, kv) = session_with(predictor.clone());
        session.apply_preset(Preset::Fraud).await;

        let before = session.history_len().await;
        let result = session.submit_on(today()).await.unwrap();

        assert_eq!(result, PredictionResult::new("Fraudulent", Some(87.0)));
        assert_eq!(session.history_len().await, before + 1);
        assert_eq!(session.history().await.last(), Some(&result));
        assert_eq!(session.result().await, Some(result));
        assert!(!session.is_loading());

        let sent = predictor.last_record.lock().unwrap().clone().unwrap();
        assert_eq!(sent.age, 45);
        assert_eq!(sent.country, "Nigeria");
        assert_eq!(sent.loyalty_score, 12);

        let stored = kv.get("history").unwrap().unwrap();
        assert!(stored.contains("Fraudulent"));
    }

    #[tokio::test]
    async fn test_network_failure_leaves_history_unchanged() {
        let (session, kv) = session_with(ScriptedPredictor::new(unreachable_service));
        session.apply_preset(Preset::Fraud).await;

        let err = session.submit_on(today()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Prediction(PredictError::Unavailable)));
        assert_eq!(err.user_message(), PREDICTION_FAILED_MESSAGE);
        assert_eq!(session.history_len().await, 0);
        assert_eq!(session.request_state(), RequestState::Idle);
        assert_eq!(session.result().await, None);
        assert!(kv.get("history").unwrap().is_none());
    }

    /// Reads nothing back, refuses every write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> HistoryResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> HistoryResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn remove(&self, _key: &str) -> HistoryResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[tokio::test]
    async fn test_failed_history_write_is_reported() {
        let predictor = ScriptedPredictor::new(fraudulent);
        let history = HistoryStore::load(Arc::new(ReadOnlyStore));
        let session = Session::new(predictor, history);
        session.apply_preset(Preset::Fraud).await;

        let err = session.submit_on(today()).await.unwrap_err();

        assert!(matches!(err, SubmitError::History(HistoryError::Io(_))));
        assert_eq!(session.history_len().await, 0);
        assert_eq!(session.result().await, None);
        assert_eq!(session.request_state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_every_service_failure_has_the_same_message() {
        let errors = [
            PredictError::Timeout,
            PredictError::Api {
                status: 500,
                message: "boom".to_string(),
            },
            PredictError::Decode("eof".to_string()),
        ];
        for e in errors {
            assert_eq!(SubmitError::from(e).user_message(), PREDICTION_FAILED_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_service() {
        let predictor = ScriptedPredictor::new(fraudulent);
        let (session, _kv) = session_with(predictor.clone());
        session.apply_preset(Preset::Normal).await;
        session.update_field(Field::Age, "twenty-eight").await;

        let err = session.submit_on(today()).await.unwrap_err();

        match err {
            SubmitError::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.for_field(Field::Age).is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_second_submission_while_pending_is_rejected() {
        let predictor = Arc::new(BlockingPredictor::default());
        let (session, _kv) = session_with(predictor.clone());
        let session = Arc::new(session);
        session.apply_preset(Preset::Loyal).await;

        let first = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.submit_on(today()).await }
        });

        predictor.started.notified().await;
        assert!(session.is_loading());

        let second = session.submit_on(today()).await;
        assert!(matches!(second, Err(SubmitError::Busy(Busy))));

        predictor.release.notify_one();
        let first = first.await.unwrap().unwrap();

        assert_eq!(first.label, "Loyal");
        assert_eq!(session.history_len().await, 1);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_reset_clears_form_and_result() {
        let (session, _kv) = session_with(ScriptedPredictor::new(fraudulent));
        session.apply_preset(Preset::Fraud).await;
        session.submit_on(today()).await.unwrap();

        session.reset().await;

        assert!(session.form().await.is_empty());
        assert_eq!(session.result().await, None);
        assert_eq!(session.history_len().await, 1);
    }

    #[tokio::test]
    async fn test_summary_tracks_history() {
        let (session, _kv) = session_with(ScriptedPredictor::new(fraudulent));
        session.apply_preset(Preset::Fraud).await;

        session.submit_on(today()).await.unwrap();
        session.submit_on(today()).await.unwrap();

        let summary = session.summary().await;
        assert_eq!(summary.fraudulent, 2);
        assert_eq!(summary.total(), 2);

        session.clear_history().await.unwrap();
        assert_eq!(session.summary().await.total(), 0);
    }

    #[tokio::test]
    async fn test_toggle_theme() {
        let (session, _kv) = session_with(ScriptedPredictor::new(fraudulent));
        assert_eq!(session.theme().await, Theme::Light);
        assert_eq!(session.toggle_theme().await, Theme::Dark);
        assert_eq!(session.toggle_theme().await, Theme::Light);
    }
}
