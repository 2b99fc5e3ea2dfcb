//! Upload service implementation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::error::UploadError;
use super::locks::OwnerLocks;
use super::saga::UploadSaga;
use super::types::{UploadOutcome, UploadRequest};
use super::validation::{ValidUpload, validate};
use crate::catalog::{AppField, AppRecordStore, BlobPatch, RecordStoreError};
use crate::storage::{BlobKind, BlobStore, object_path};
use folio_shared::config::SchemaDriftPolicy;
use folio_shared::types::AppId;

/// Upload service linking stored blobs into app records.
pub struct UploadService<S: AppRecordStore, B: BlobStore> {
    records: Arc<S>,
    blobs: Arc<B>,
    schema_drift: SchemaDriftPolicy,
    locks: Option<Arc<OwnerLocks>>,
}

impl<S: AppRecordStore, B: BlobStore> UploadService<S, B> {
    /// Create a new upload service with the default schema drift policy and
    /// no per-app locking.
    #[must_use]
    pub fn new(records: Arc<S>, blobs: Arc<B>) -> Self {
        Self {
            records,
            blobs,
            schema_drift: SchemaDriftPolicy::default(),
            locks: None,
        }
    }

    /// Set the schema drift policy.
    #[must_use]
    pub const fn with_schema_drift(mut self, policy: SchemaDriftPolicy) -> Self {
        self.schema_drift = policy;
        self
    }

    /// Serialise uploads per app through the given lock table.
    #[must_use]
    pub fn with_owner_locks(mut self, locks: Arc<OwnerLocks>) -> Self {
        self.locks = Some(locks);
        self
    }

    /// Store a package or image and link it into its app record.
    ///
    /// On success the record references the new blob and any previous blob of
    /// the same kind has been deleted (best-effort). On failure after the blob
    /// was written, the blob has been deleted again.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `UploadError::Invalid` if validation fails (no side effect)
    /// - `UploadError::OwnerMissing` if the app does not exist (no side effect)
    /// - `UploadError::Storage` if the blob cannot be written
    /// - `UploadError::Record` if the record cannot be updated
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, UploadError> {
        let upload = validate(request)?;
        let (kind, app_id) = (upload.kind, upload.app_id);

        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(app_id).await),
            None => None,
        };

        let refs = self
            .records
            .find_blob_refs(app_id)
            .await?
            .ok_or(UploadError::OwnerMissing(app_id))?;
        let previous = refs.path(kind).map(str::to_string);

        let mut saga = UploadSaga::begin(kind, app_id);
        let path = self.write_blob(&upload).await?;
        saga.blob_written(path.clone());

        let public_url = self.blobs.public_url(kind, &path);
        let patch = Self::patch(&upload, &path, &public_url);

        let warning = match self.link(app_id, &patch).await {
            Ok(warning) => warning,
            Err(e) => {
                self.compensate(&mut saga).await;
                return Err(e);
            }
        };
        saga.record_updated();

        if let Some(old) = previous.filter(|old| *old != path)
            && let Err(e) = self.blobs.remove(kind, &old).await
        {
            warn!(error = %e, app_id = %app_id, path = %old, kind = kind.label(), "Failed to delete replaced blob");
        }
        saga.commit();

        info!(
            app_id = %app_id,
            kind = kind.label(),
            path = %path,
            size = upload.size(),
            degraded = warning.is_some(),
            "Upload committed"
        );

        Ok(UploadOutcome {
            file_path: path,
            file_size: upload.size(),
            file_type: upload.file_type,
            file_name: upload.file_name,
            public_url,
            warning,
        })
    }

    /// Write the blob, regenerating the timestamp once on a duplicate key.
    async fn write_blob(&self, upload: &ValidUpload) -> Result<String, UploadError> {
        let first_millis = Utc::now().timestamp_millis();
        let path = object_path(upload.app_id, first_millis, &upload.file_name);

        match self
            .blobs
            .put(upload.kind, &path, upload.data.clone(), upload.content_type)
            .await
        {
            Ok(()) => Ok(path),
            Err(e) if e.is_duplicate() => {
                let retry_millis = Utc::now().timestamp_millis().max(first_millis + 1);
                let retry_path = object_path(upload.app_id, retry_millis, &upload.file_name);
                warn!(app_id = %upload.app_id, path = %path, retry = %retry_path, "Object key taken, retrying once");

                self.blobs
                    .put(upload.kind, &retry_path, upload.data.clone(), upload.content_type)
                    .await?;
                Ok(retry_path)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn patch(upload: &ValidUpload, path: &str, public_url: &str) -> BlobPatch {
        match upload.kind {
            BlobKind::Package => BlobPatch::Package {
                file_path: path.to_string(),
                file_name: upload.file_name.clone(),
                file_size: i64::try_from(upload.size()).ok(),
                file_type: upload.file_type,
                download_link: Some(public_url.to_string()),
            },
            BlobKind::Image => BlobPatch::Image {
                image_path: path.to_string(),
                image_url: Some(public_url.to_string()),
            },
        }
    }

    /// Update the record; returns a warning on degraded success.
    async fn link(&self, app_id: AppId, patch: &BlobPatch) -> Result<Option<String>, UploadError> {
        let field = match self.records.link_blob(app_id, patch).await {
            Ok(true) => return Ok(None),
            Ok(false) => return Err(UploadError::OwnerMissing(app_id)),
            Err(RecordStoreError::MissingField(field))
                if self.schema_drift == SchemaDriftPolicy::Degrade =>
            {
                field
            }
            Err(e) => return Err(e.into()),
        };

        let Some(degraded) = patch.without(field) else {
            return Err(RecordStoreError::MissingField(field).into());
        };
        warn!(app_id = %app_id, column = field.column(), "Column missing, retrying record update without it");

        match self.records.link_blob(app_id, &degraded).await {
            Ok(true) => Ok(Some(degraded_warning(field))),
            Ok(false) => Err(UploadError::OwnerMissing(app_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn compensate(&self, saga: &mut UploadSaga) {
        let Some(path) = saga.pending_compensation().map(str::to_string) else {
            return;
        };

        if let Err(e) = self.blobs.remove(saga.kind(), &path).await {
            error!(error = %e, path = %path, "Failed to delete blob after record update failed; blob is orphaned");
        }
        saga.compensated();
    }

    /// Clear an app's image and delete the blob (best-effort).
    ///
    /// Succeeds without side effects when the app has no image. Under the
    /// degrade policy a missing `image_url` column only clears `image_path`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::AppNotFound` if the app does not exist.
    pub async fn remove_image(&self, app_id: AppId) -> Result<(), UploadError> {
        let refs = self
            .records
            .find_blob_refs(app_id)
            .await?
            .ok_or(UploadError::AppNotFound(app_id))?;

        let Some(path) = refs.path(BlobKind::Image) else {
            return Ok(());
        };

        let cleared = match self
            .records
            .clear_fields(app_id, &[AppField::ImagePath, AppField::ImageUrl])
            .await
        {
            Err(RecordStoreError::MissingField(AppField::ImageUrl))
                if self.schema_drift == SchemaDriftPolicy::Degrade =>
            {
                warn!(app_id = %app_id, "image_url column missing, clearing image_path only");
                self.records
                    .clear_fields(app_id, &[AppField::ImagePath])
                    .await?
            }
            result => result?,
        };
        if !cleared {
            return Err(UploadError::AppNotFound(app_id));
        }

        if let Err(e) = self.blobs.remove(BlobKind::Image, path).await {
            warn!(error = %e, app_id = %app_id, path, "Failed to delete removed image");
        }

        info!(app_id = %app_id, "Image removed");
        Ok(())
    }
}

fn degraded_warning(field: AppField) -> String {
    match field {
        AppField::ImageUrl => {
            "image_url column missing - only image_path was updated. Please run migration.".into()
        }
        other => format!(
            "{} column missing - it was not updated. Please run migration.",
            other.column()
        ),
    }
}
