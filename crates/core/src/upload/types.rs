//! Upload request and response types.

use bytes::Bytes;
use serde::Serialize;

use crate::catalog::FileType;
use crate::storage::BlobKind;
use folio_shared::types::AppId;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Original file name.
    pub name: String,
    /// File contents.
    pub data: Bytes,
}

impl IncomingFile {
    /// Create a new incoming file.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lowercased text after the last dot, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// An upload as received, before validation.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Package or image.
    pub kind: BlobKind,
    /// Owning app.
    pub app_id: Option<AppId>,
    /// The file.
    pub file: Option<IncomingFile>,
}

impl UploadRequest {
    /// Create a package upload request.
    #[must_use]
    pub const fn package(app_id: Option<AppId>, file: Option<IncomingFile>) -> Self {
        Self {
            kind: BlobKind::Package,
            app_id,
            file,
        }
    }

    /// Create an image upload request.
    #[must_use]
    pub const fn image(app_id: Option<AppId>, file: Option<IncomingFile>) -> Self {
        Self {
            kind: BlobKind::Image,
            app_id,
            file,
        }
    }
}

/// Result of a committed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    /// Object key.
    pub file_path: String,
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Package type; images have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    /// Public URL of the object.
    pub public_url: String,
    /// Set when the record was only partially updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
