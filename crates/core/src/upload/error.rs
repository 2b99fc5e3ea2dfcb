//! Upload error types.

use thiserror::Error;

use crate::catalog::RecordStoreError;
use crate::storage::StorageError;
use folio_shared::types::AppId;

/// Errors from the upload workflow.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Rejected before any side effect.
    #[error("{0}")]
    Invalid(String),

    /// The owning app record does not exist.
    #[error("owner required: app {0} does not exist. Please save the app first.")]
    OwnerMissing(AppId),

    /// The app targeted by an image removal does not exist.
    #[error("App not found")]
    AppNotFound(AppId),

    /// Object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Record store failure.
    #[error(transparent)]
    Record(#[from] RecordStoreError),
}

impl UploadError {
    /// Whether the request itself was at fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Invalid(_) | Self::OwnerMissing(_) | Self::AppNotFound(_)
        )
    }
}
