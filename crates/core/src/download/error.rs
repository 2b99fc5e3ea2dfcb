//! Download error types.

use thiserror::Error;

use crate::catalog::RecordStoreError;
use crate::storage::StorageError;

/// Errors from resolving a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// No app with this ID.
    #[error("App not found")]
    AppNotFound,

    /// The record references a package that is not in storage.
    #[error("File not found")]
    FileNotFound,

    /// Neither a stored package nor an external link.
    #[error("No download available for this app")]
    NoDownload,

    /// Object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Record store failure.
    #[error(transparent)]
    Record(#[from] RecordStoreError),
}
