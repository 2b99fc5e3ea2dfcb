//! Catalog error types.

use thiserror::Error;

use super::repository::RecordStoreError;
use folio_shared::types::AppId;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No app with this ID.
    #[error("App not found")]
    NotFound(AppId),

    /// Invalid input.
    #[error("{0}")]
    Validation(String),

    /// Record store failure.
    #[error(transparent)]
    Record(#[from] RecordStoreError),
}
