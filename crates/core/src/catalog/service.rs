//! Catalog service implementation.

use std::sync::Arc;

use tracing::warn;

use super::error::CatalogError;
use super::repository::AppRecordStore;
use super::types::{App, AppChanges, AppUpdate, NewApp, normalize_tags};
use crate::storage::{BlobKind, BlobStore};
use folio_shared::types::AppId;

/// Catalog service for managing app records.
pub struct CatalogService<S: AppRecordStore, B: BlobStore> {
    records: Arc<S>,
    blobs: Arc<B>,
}

impl<S: AppRecordStore, B: BlobStore> CatalogService<S, B> {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(records: Arc<S>, blobs: Arc<B>) -> Self {
        Self { records, blobs }
    }

    /// List all apps in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store fails.
    pub async fn list(&self) -> Result<Vec<App>, CatalogError> {
        Ok(self.records.list().await?)
    }

    /// Get an app by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the app does not exist.
    pub async fn get(&self, id: AppId) -> Result<App, CatalogError> {
        self.records
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Count apps.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store fails.
    pub async fn count(&self) -> Result<u64, CatalogError> {
        Ok(self.records.count().await?)
    }

    /// Create an app without any stored file or image.
    ///
    /// New apps go to the end of the list unless a `display_order` is given.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the title is empty.
    pub async fn create(&self, mut input: NewApp) -> Result<App, CatalogError> {
        input.title = input.title.trim().to_string();
        if input.title.is_empty() {
            return Err(CatalogError::Validation("Title is required".into()));
        }
        input.tags = normalize_tags(input.tags);
        input.download_link = non_empty(input.download_link);

        if input.display_order.is_none() {
            let count = self.records.count().await?;
            input.display_order = Some(i32::try_from(count).unwrap_or(i32::MAX));
        }

        Ok(self.records.create(input).await?)
    }

    /// Update an app's editable fields in place.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the app does not exist, or
    /// `CatalogError::Validation` if the title would become empty.
    pub async fn update(&self, id: AppId, update: AppUpdate) -> Result<App, CatalogError> {
        let changes = Self::normalize(update)?;
        if changes.is_empty() {
            return self.get(id).await;
        }

        self.records
            .update(id, changes)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    fn normalize(update: AppUpdate) -> Result<AppChanges, CatalogError> {
        let title = match update.title {
            Some(t) if t.trim().is_empty() => {
                return Err(CatalogError::Validation("Title is required".into()));
            }
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };

        Ok(AppChanges {
            title,
            description: update.description,
            category: update.category,
            tags: update.tags.map(normalize_tags),
            download_link: update.download_link.map(|l| non_empty(Some(l))),
            display_order: update.display_order,
        })
    }

    /// Delete an app, then best-effort remove its stored package and image.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the app does not exist.
    pub async fn delete(&self, id: AppId) -> Result<(), CatalogError> {
        let refs = self
            .records
            .find_blob_refs(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        if !self.records.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }

        for kind in [BlobKind::Package, BlobKind::Image] {
            if let Some(path) = refs.path(kind)
                && let Err(e) = self.blobs.remove(kind, path).await
            {
                warn!(error = %e, app_id = %id, path, kind = kind.label(), "Failed to remove blob of deleted app");
            }
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
