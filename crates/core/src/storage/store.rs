//! The blob store seam used by the upload and download workflows.

use std::future::Future;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Which collection a blob belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobKind {
    /// Installable app package (`.apk`, `.ipa`).
    Package,
    /// App cover image.
    Image,
}

impl BlobKind {
    /// Short label for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Image => "image",
        }
    }
}

/// Object storage operations needed by the core workflows.
///
/// Implemented by `StorageService`; tests provide in-memory fakes.
pub trait BlobStore: Send + Sync {
    /// Write a new object.
    ///
    /// Fails with `StorageError::AlreadyExists` if the key is taken; never
    /// overwrites.
    fn put(
        &self,
        kind: BlobKind,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Read a whole object.
    fn get(
        &self,
        kind: BlobKind,
        path: &str,
    ) -> impl Future<Output = Result<Bytes, StorageError>> + Send;

    /// Delete an object. Deleting a missing object succeeds.
    fn remove(
        &self,
        kind: BlobKind,
        path: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Public URL of an object.
    fn public_url(&self, kind: BlobKind, path: &str) -> String;
}
