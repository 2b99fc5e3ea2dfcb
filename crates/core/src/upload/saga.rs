//! Upload saga state.

use tracing::debug;

use crate::storage::BlobKind;
use folio_shared::types::AppId;

/// Where an upload stands between the two backing systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaState {
    /// Nothing written yet.
    Pending,
    /// Blob stored, record not yet linked. Compensation deletes the blob.
    BlobWritten,
    /// Record points at the new blob.
    RecordUpdated,
    /// Old blob handled, response ready.
    Committed,
    /// Blob deleted after a failed record update.
    Compensated,
}

/// Tracks one upload through its states.
#[derive(Debug)]
pub struct UploadSaga {
    kind: BlobKind,
    app_id: AppId,
    path: Option<String>,
    state: SagaState,
}

impl UploadSaga {
    /// Start a saga for an upload.
    #[must_use]
    pub const fn begin(kind: BlobKind, app_id: AppId) -> Self {
        Self {
            kind,
            app_id,
            path: None,
            state: SagaState::Pending,
        }
    }

    /// Blob kind being uploaded.
    #[must_use]
    pub const fn kind(&self) -> BlobKind {
        self.kind
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SagaState {
        self.state
    }

    /// Path of the blob written by this saga.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The blob is in storage.
    pub fn blob_written(&mut self, path: impl Into<String>) {
        debug_assert_eq!(self.state, SagaState::Pending);
        self.path = Some(path.into());
        self.transition(SagaState::BlobWritten);
    }

    /// The record references the blob.
    pub fn record_updated(&mut self) {
        debug_assert_eq!(self.state, SagaState::BlobWritten);
        self.transition(SagaState::RecordUpdated);
    }

    /// The upload is complete.
    pub fn commit(&mut self) {
        debug_assert_eq!(self.state, SagaState::RecordUpdated);
        self.transition(SagaState::Committed);
    }

    /// Blob that must be deleted if the saga stops here.
    #[must_use]
    pub fn pending_compensation(&self) -> Option<&str> {
        match self.state {
            SagaState::BlobWritten => self.path(),
            _ => None,
        }
    }

    /// The compensating delete ran.
    pub fn compensated(&mut self) {
        debug_assert_eq!(self.state, SagaState::BlobWritten);
        self.transition(SagaState::Compensated);
    }

    fn transition(&mut self, next: SagaState) {
        debug!(
            app_id = %self.app_id,
            kind = self.kind.label(),
            from = ?self.state,
            to = ?next,
            "Upload saga transition"
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut saga = UploadSaga::begin(BlobKind::Image, AppId::new());
        assert_eq!(saga.state(), SagaState::Pending);
        assert!(saga.pending_compensation().is_none());

        saga.blob_written("apps/a/1_a.png");
        assert_eq!(saga.pending_compensation(), Some("apps/a/1_a.png"));

        saga.record_updated();
        assert!(saga.pending_compensation().is_none());

        saga.commit();
        assert_eq!(saga.state(), SagaState::Committed);
        assert_eq!(saga.path(), Some("apps/a/1_a.png"));
    }

    #[test]
    fn test_compensation_path() {
        let mut saga = UploadSaga::begin(BlobKind::Package, AppId::new());
        saga.blob_written("apps/a/1_a.apk");
        saga.compensated();
        assert_eq!(saga.state(), SagaState::Compensated);
        assert!(saga.pending_compensation().is_none());
    }
}
