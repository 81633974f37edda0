//! Per-browser session state.
//!
//! Each session remembers the last uploaded diagram, the chosen method and
//! the last completed analysis. Sessions live in memory only and are keyed
//! by an opaque id carried in a cookie.
//!
//! A session has two locks. `state` guards the upload and stored result and
//! is only held briefly. `analysis` serialises analyses so a repeated results
//! request waits for the running one and then finds its result cached.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::analysis::{AnalysisMethod, AnalysisRecord};

/// Errors surfaced to the page layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Results were requested before anything was uploaded.
    #[error("no diagram has been uploaded in this session")]
    MissingInput,
}

/// SHA-256 of the uploaded bytes, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// The diagram a user submitted.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Arc<[u8]>,
    pub file_name: String,
    pub image_hash: String,
    pub method: AnalysisMethod,
}

impl Upload {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, method: AnalysisMethod) -> Self {
        let image_hash = content_hash(&bytes);
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            image_hash,
            method,
        }
    }
}

/// State owned by one session's single logical flow.
#[derive(Debug, Default)]
pub struct SessionState {
    upload: Option<Upload>,
    last: Option<AnalysisRecord>,
}

impl SessionState {
    /// Record a new upload and drop any previous result.
    pub fn begin_upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
        self.last = None;
    }

    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    /// The stored result, if it was computed for the current upload.
    pub fn cached_result(&self) -> Option<&AnalysisRecord> {
        let upload = self.upload.as_ref()?;
        self.last
            .as_ref()
            .filter(|r| r.image_hash == upload.image_hash && r.mode == upload.method)
    }

    /// Store a finished analysis. Ignored (returns false) when the upload
    /// was replaced while the analysis ran.
    pub(crate) fn store_result(&mut self, record: AnalysisRecord) -> bool {
        let current = self
            .upload
            .as_ref()
            .is_some_and(|u| u.image_hash == record.image_hash && u.method == record.mode);
        if current {
            self.last = Some(record);
        }
        current
    }
}

/// One browser session.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
    analysis: Mutex<()>,
}

impl Session {
    /// Lock the session's upload and stored result.
    pub async fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    /// Held for the duration of one analysis.
    pub(crate) async fn analysis_slot(&self) -> MutexGuard<'_, ()> {
        self.analysis.lock().await
    }
}

/// Shared handle to one session.
pub type SessionHandle = Arc<Session>;

/// In-memory map of session id to state.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an existing session.
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Return the session for `id`, creating a fresh one (with a new id) when
    /// `id` is absent or unknown.
    pub async fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle) {
        if let Some(id) = id {
            if let Some(handle) = self.get(id).await {
                return (id.to_string(), handle);
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let handle = SessionHandle::default();
        self.sessions
            .write()
            .await
            .insert(id.clone(), handle.clone());
        tracing::debug!("Created session {}", id);
        (id, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::ParsedResult;

    fn record_for(upload: &Upload) -> AnalysisRecord {
        AnalysisRecord::new(
            upload.method,
            upload.image_hash.clone(),
            ParsedResult::failure("x"),
            None,
            std::time::Duration::ZERO,
        )
    }

    #[test]
    fn test_content_hash() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_new_upload_clears_result() {
        let mut state = SessionState::default();
        let upload = Upload::new(vec![1, 2, 3], "a.png", AnalysisMethod::Vision);
        state.begin_upload(upload.clone());
        state.store_result(record_for(&upload));
        assert!(state.cached_result().is_some());

        state.begin_upload(Upload::new(vec![1, 2, 3], "a.png", AnalysisMethod::Vision));
        assert!(state.last.is_none());
    }

    #[test]
    fn test_stale_result_not_stored() {
        let mut state = SessionState::default();
        let old = Upload::new(vec![1], "a.png", AnalysisMethod::Vision);
        let record = record_for(&old);

        state.begin_upload(Upload::new(vec![2], "b.png", AnalysisMethod::Vision));
        assert!(!state.store_result(record));
        assert!(state.last.is_none());

        state.begin_upload(old.clone());
        assert!(state.store_result(record_for(&old)));
        assert!(state.cached_result().is_some());
    }

    #[test]
    fn test_cached_result_requires_matching_key() {
        let mut state = SessionState::default();
        let first = Upload::new(vec![1], "a.png", AnalysisMethod::Vision);
        state.begin_upload(first.clone());
        state.store_result(record_for(&first));

        // Same bytes, different method
        state.upload = Some(Upload::new(vec![1], "a.png", AnalysisMethod::VisionExtract));
        assert!(state.cached_result().is_none());

        // Different bytes, same method
        state.upload = Some(Upload::new(vec![2], "a.png", AnalysisMethod::Vision));
        assert!(state.cached_result().is_none());

        state.upload = Some(first);
        assert!(state.cached_result().is_some());
    }

    #[tokio::test]
    async fn test_store_creates_and_reuses() {
        let store = SessionStore::new();

        let (id, handle) = store.get_or_create(None).await;
        handle
            .state()
            .await
            .begin_upload(Upload::new(vec![9], "d.png", AnalysisMethod::OcrLlm));

        let (same_id, same) = store.get_or_create(Some(&id)).await;
        assert_eq!(same_id, id);
        assert!(same.state().await.upload().is_some());

        let (other_id, other) = store.get_or_create(Some("stale-id")).await;
        assert_ne!(other_id, id);
        assert!(other.state().await.upload().is_none());
        assert!(store.get(&other_id).await.is_some());
        assert!(store.get("never-issued").await.is_none());
    }

    #[tokio::test]
    async fn test_state_available_during_analysis() {
        let session = Session::default();
        let _running = session.analysis_slot().await;

        let state = tokio::time::timeout(std::time::Duration::from_secs(1), session.state())
            .await
            .expect("state lock must not wait for the analysis");
        assert!(state.upload().is_none());
    }
}
