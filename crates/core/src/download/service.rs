//! Download service implementation.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use super::error::DownloadError;
use crate::catalog::{AppRecordStore, FileType};
use crate::storage::{BlobKind, BlobStore, StorageError};
use folio_shared::types::AppId;

/// A stored package ready to stream.
#[derive(Debug, Clone)]
pub struct StoredDownload {
    /// Package contents.
    pub bytes: Bytes,
    /// Original file name.
    pub file_name: String,
    /// MIME type derived from the stored package type.
    pub content_type: &'static str,
}

/// How to serve an app's artifact.
#[derive(Debug, Clone)]
pub enum Download {
    /// Stream the stored package.
    Stream(StoredDownload),
    /// Redirect to the external link.
    Redirect(String),
}

/// Download service resolving apps to artifacts.
pub struct DownloadService<S: AppRecordStore, B: BlobStore> {
    records: Arc<S>,
    blobs: Arc<B>,
}

impl<S: AppRecordStore, B: BlobStore> DownloadService<S, B> {
    /// Create a new download service.
    #[must_use]
    pub fn new(records: Arc<S>, blobs: Arc<B>) -> Self {
        Self { records, blobs }
    }

    /// Resolve an app to a stream or a redirect and count the download.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `DownloadError::AppNotFound` if the app does not exist
    /// - `DownloadError::FileNotFound` if the stored package is gone
    /// - `DownloadError::NoDownload` if the app has neither file nor link
    pub async fn resolve(&self, app_id: AppId) -> Result<Download, DownloadError> {
        let source = self
            .records
            .find_download_source(app_id)
            .await?
            .ok_or(DownloadError::AppNotFound)?;

        if let Some((path, name)) = source.stored_file() {
            let bytes = match self.blobs.get(BlobKind::Package, path).await {
                Ok(bytes) => bytes,
                Err(StorageError::NotFound { .. }) => {
                    warn!(app_id = %app_id, path, "Stored package missing from storage");
                    return Err(DownloadError::FileNotFound);
                }
                Err(e) => return Err(e.into()),
            };

            self.count(app_id).await;
            debug!(app_id = %app_id, path, size = bytes.len(), "Streaming stored package");

            return Ok(Download::Stream(StoredDownload {
                bytes,
                file_name: name.to_string(),
                content_type: content_type(source.file_type),
            }));
        }

        if let Some(link) = source.download_link.filter(|l| !l.is_empty()) {
            self.count(app_id).await;
            debug!(app_id = %app_id, link = %link, "Redirecting to external download");
            return Ok(Download::Redirect(link));
        }

        Err(DownloadError::NoDownload)
    }

    async fn count(&self, app_id: AppId) {
        if let Err(e) = self.records.increment_downloads(app_id).await {
            warn!(error = %e, app_id = %app_id, "Failed to increment download count");
        }
    }
}

fn content_type(file_type: Option<FileType>) -> &'static str {
    file_type.map_or("application/octet-stream", FileType::content_type)
}
