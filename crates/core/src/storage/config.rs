//! Storage configuration types.

use folio_shared::config::{StorageProvider, StorageSettings};

use super::store::BlobKind;

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Bucket holding installable packages.
    pub package_bucket: String,
    /// Bucket holding app images.
    pub image_bucket: String,
    /// Base URL under which `{bucket}/{path}` is publicly readable.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Default package bucket.
    pub const DEFAULT_PACKAGE_BUCKET: &'static str = "app-files";
    /// Default image bucket.
    pub const DEFAULT_IMAGE_BUCKET: &'static str = "app-image";

    /// Create a new storage config with default buckets.
    #[must_use]
    pub fn new(provider: StorageProvider, public_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            package_bucket: Self::DEFAULT_PACKAGE_BUCKET.to_string(),
            image_bucket: Self::DEFAULT_IMAGE_BUCKET.to_string(),
            public_base_url: public_base_url.into(),
        }
    }

    /// In-memory storage, for tests and local experiments.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(StorageProvider::Memory, "http://localhost/storage")
    }

    /// Bucket for the given blob kind.
    #[must_use]
    pub fn bucket(&self, kind: BlobKind) -> &str {
        match kind {
            BlobKind::Package => &self.package_bucket,
            BlobKind::Image => &self.image_bucket,
        }
    }

    /// Public URL of an object.
    #[must_use]
    pub fn public_url(&self, kind: BlobKind, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket(kind),
            path.trim_start_matches('/')
        )
    }
}

impl From<StorageSettings> for StorageConfig {
    fn from(settings: StorageSettings) -> Self {
        Self {
            provider: settings.provider,
            package_bucket: settings.package_bucket,
            image_bucket: settings.image_bucket,
            public_base_url: settings.public_base_url,
        }
    }
}
