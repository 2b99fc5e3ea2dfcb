//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Builder, ErrorKind, Operator, services};

use super::config::StorageConfig;
use super::error::StorageError;
use super::store::{BlobKind, BlobStore};
use folio_shared::config::StorageProvider;

/// Storage service for app packages and images.
pub struct StorageService {
    packages: Operator,
    images: Operator,
    config: StorageConfig,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("provider", &self.provider_name())
            .field("package_bucket", &self.config.package_bucket)
            .field("image_bucket", &self.config.image_bucket)
            .finish_non_exhaustive()
    }
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let packages = Self::create_operator(&config.provider, &config.package_bucket)?;
        let images = Self::create_operator(&config.provider, &config.image_bucket)?;
        Ok(Self {
            packages,
            images,
            config,
        })
    }

    /// Create OpenDAL operator for one bucket.
    fn create_operator(provider: &StorageProvider, bucket: &str) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                if !endpoint.is_empty() {
                    builder = builder.endpoint(endpoint);
                }
                finish(builder)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
            } => {
                let builder = services::Azblob::default()
                    .endpoint(&format!("https://{account}.blob.core.windows.net"))
                    .account_name(account)
                    .account_key(access_key)
                    .container(bucket);
                finish(builder)
            }
            StorageProvider::LocalFs { root } => {
                let root = format!("{}/{bucket}", root.trim_end_matches('/'));
                finish(services::Fs::default().root(&root))
            }
            StorageProvider::Memory => finish(services::Memory::default()),
        }
    }

    fn operator(&self, kind: BlobKind) -> &Operator {
        match kind {
            BlobKind::Package => &self.packages,
            BlobKind::Image => &self.images,
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        match self.config.provider {
            StorageProvider::S3 { .. } => "s3",
            StorageProvider::AzureBlob { .. } => "azure_blob",
            StorageProvider::LocalFs { .. } => "local",
            StorageProvider::Memory => "memory",
        }
    }

    /// Check if an object exists in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    pub async fn exists(&self, kind: BlobKind, path: &str) -> Result<bool, StorageError> {
        Ok(self.operator(kind).exists(path).await?)
    }
}

fn finish<B: Builder>(builder: B) -> Result<Operator, StorageError> {
    Ok(Operator::new(builder)
        .map_err(|e| StorageError::configuration(e.to_string()))?
        .finish())
}

impl BlobStore for StorageService {
    async fn put(
        &self,
        kind: BlobKind,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let op = self.operator(kind);
        let capability = op.info().full_capability();

        // S3, Azure Blob and fs reject a taken key in the write itself.
        // The memory backend has no conditional write.
        if !capability.write_with_if_not_exists && op.exists(path).await? {
            return Err(StorageError::already_exists(path));
        }

        let mut write = op.write_with(path, data);
        if capability.write_with_if_not_exists {
            write = write.if_not_exists(true);
        }
        if capability.write_with_content_type {
            write = write.content_type(content_type);
        }
        write.await?;
        Ok(())
    }

    async fn get(&self, kind: BlobKind, path: &str) -> Result<Bytes, StorageError> {
        match self.operator(kind).read(path).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(path)),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, kind: BlobKind, path: &str) -> Result<(), StorageError> {
        self.operator(kind)
            .delete(path)
            .await
            .map_err(StorageError::from)
    }

    fn public_url(&self, kind: BlobKind, path: &str) -> String {
        self.config.public_url(kind, path)
    }
}
