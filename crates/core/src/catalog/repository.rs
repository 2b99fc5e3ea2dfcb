//! The record store seam for app records.

use std::future::Future;

use thiserror::Error;

use super::types::{App, AppChanges, BlobRefs, DownloadSource, FileType, NewApp};
use crate::storage::BlobKind;
use folio_shared::types::AppId;

/// Columns the upload workflow writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppField {
    /// `file_path`
    FilePath,
    /// `file_name`
    FileName,
    /// `file_size`
    FileSize,
    /// `file_type`
    FileType,
    /// `download_link`
    DownloadLink,
    /// `image_path`
    ImagePath,
    /// `image_url`
    ImageUrl,
}

impl AppField {
    /// Column name in the `apps` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::FilePath => "file_path",
            Self::FileName => "file_name",
            Self::FileSize => "file_size",
            Self::FileType => "file_type",
            Self::DownloadLink => "download_link",
            Self::ImagePath => "image_path",
            Self::ImageUrl => "image_url",
        }
    }

    /// Look up a field by column name.
    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        [
            Self::FilePath,
            Self::FileName,
            Self::FileSize,
            Self::FileType,
            Self::DownloadLink,
            Self::ImagePath,
            Self::ImageUrl,
        ]
        .into_iter()
        .find(|f| f.column() == column)
    }

    /// Fields an upload can never drop: without them the blob is unreachable.
    #[must_use]
    pub const fn is_essential(self) -> bool {
        matches!(self, Self::FilePath | Self::FileName | Self::ImagePath)
    }
}

/// Record store errors.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// The schema lacks a column the write referenced.
    #[error("column \"{}\" does not exist", .0.column())]
    MissingField(AppField),

    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Fields linking a freshly written blob into its app record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobPatch {
    /// Stored package descriptor plus the derived download link.
    Package {
        /// Object key.
        file_path: String,
        /// Original file name.
        file_name: String,
        /// Size in bytes.
        file_size: Option<i64>,
        /// Package type.
        file_type: Option<FileType>,
        /// Public URL of the package.
        download_link: Option<String>,
    },
    /// Stored image descriptor.
    Image {
        /// Object key.
        image_path: String,
        /// Public URL of the image.
        image_url: Option<String>,
    },
}

impl BlobPatch {
    /// Blob kind this patch links.
    #[must_use]
    pub const fn kind(&self) -> BlobKind {
        match self {
            Self::Package { .. } => BlobKind::Package,
            Self::Image { .. } => BlobKind::Image,
        }
    }

    /// Fields this patch writes.
    #[must_use]
    pub fn fields(&self) -> Vec<AppField> {
        match self {
            Self::Package {
                file_size,
                file_type,
                download_link,
                ..
            } => {
                let mut fields = vec![AppField::FilePath, AppField::FileName];
                if file_size.is_some() {
                    fields.push(AppField::FileSize);
                }
                if file_type.is_some() {
                    fields.push(AppField::FileType);
                }
                if download_link.is_some() {
                    fields.push(AppField::DownloadLink);
                }
                fields
            }
            Self::Image { image_url, .. } => {
                let mut fields = vec![AppField::ImagePath];
                if image_url.is_some() {
                    fields.push(AppField::ImageUrl);
                }
                fields
            }
        }
    }

    /// The same patch minus one non-essential field.
    ///
    /// Returns `None` if the field is essential or not written by this patch.
    #[must_use]
    pub fn without(&self, field: AppField) -> Option<Self> {
        if field.is_essential() || !self.fields().contains(&field) {
            return None;
        }

        let mut patch = self.clone();
        match (&mut patch, field) {
            (Self::Package { file_size, .. }, AppField::FileSize) => *file_size = None,
            (Self::Package { file_type, .. }, AppField::FileType) => *file_type = None,
            (Self::Package { download_link, .. }, AppField::DownloadLink) => *download_link = None,
            (Self::Image { image_url, .. }, AppField::ImageUrl) => *image_url = None,
            _ => return None,
        }
        Some(patch)
    }
}

/// Repository trait for app persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AppRecordStore: Send + Sync {
    /// Find app by ID.
    fn find_by_id(
        &self,
        id: AppId,
    ) -> impl Future<Output = Result<Option<App>, RecordStoreError>> + Send;

    /// Read only the blob keys of an app.
    ///
    /// Must not touch columns outside `id`, `file_path` and `image_path`, so it
    /// keeps working while an optional column is missing.
    fn find_blob_refs(
        &self,
        id: AppId,
    ) -> impl Future<Output = Result<Option<BlobRefs>, RecordStoreError>> + Send;

    /// Read only the package columns a download needs.
    fn find_download_source(
        &self,
        id: AppId,
    ) -> impl Future<Output = Result<Option<DownloadSource>, RecordStoreError>> + Send;

    /// List apps by `display_order`, then creation time.
    fn list(&self) -> impl Future<Output = Result<Vec<App>, RecordStoreError>> + Send;

    /// Count apps.
    fn count(&self) -> impl Future<Output = Result<u64, RecordStoreError>> + Send;

    /// Create an app. `display_order` is resolved by the caller.
    fn create(&self, input: NewApp) -> impl Future<Output = Result<App, RecordStoreError>> + Send;

    /// Apply changes; `None` if the app does not exist.
    fn update(
        &self,
        id: AppId,
        changes: AppChanges,
    ) -> impl Future<Output = Result<Option<App>, RecordStoreError>> + Send;

    /// Delete an app; `false` if it did not exist.
    fn delete(&self, id: AppId) -> impl Future<Output = Result<bool, RecordStoreError>> + Send;

    /// Write blob linkage fields; `false` if the app does not exist.
    fn link_blob(
        &self,
        id: AppId,
        patch: &BlobPatch,
    ) -> impl Future<Output = Result<bool, RecordStoreError>> + Send;

    /// Set the given blob linkage fields to null; `false` if the app does not exist.
    fn clear_fields(
        &self,
        id: AppId,
        fields: &[AppField],
    ) -> impl Future<Output = Result<bool, RecordStoreError>> + Send;

    /// Atomically add one to `download_count`.
    fn increment_downloads(
        &self,
        id: AppId,
    ) -> impl Future<Output = Result<(), RecordStoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_patch() -> BlobPatch {
        BlobPatch::Package {
            file_path: "apps/a/1_x.apk".into(),
            file_name: "x.apk".into(),
            file_size: Some(3),
            file_type: Some(FileType::Apk),
            download_link: Some("http://x/app-files/apps/a/1_x.apk".into()),
        }
    }

    #[test]
    fn test_column_round_trip() {
        for field in [AppField::FileSize, AppField::ImageUrl, AppField::FilePath] {
            assert_eq!(AppField::from_column(field.column()), Some(field));
        }
        assert_eq!(AppField::from_column("title"), None);
    }

    #[test]
    fn test_without_drops_optional_field() {
        let patch = package_patch().without(AppField::DownloadLink).unwrap();
        assert!(!patch.fields().contains(&AppField::DownloadLink));
        assert!(patch.fields().contains(&AppField::FilePath));
    }

    #[test]
    fn test_without_never_drops_essential_fields() {
        assert!(package_patch().without(AppField::FilePath).is_none());
        assert!(package_patch().without(AppField::FileName).is_none());

        let image = BlobPatch::Image {
            image_path: "p".into(),
            image_url: Some("u".into()),
        };
        assert!(image.without(AppField::ImagePath).is_none());
        assert!(image.without(AppField::ImageUrl).is_some());
    }

    #[test]
    fn test_without_foreign_field_is_none() {
        assert!(package_patch().without(AppField::ImageUrl).is_none());
    }

    #[test]
    fn test_missing_field_message_names_column() {
        let err = RecordStoreError::MissingField(AppField::ImageUrl);
        assert_eq!(err.to_string(), "column \"image_url\" does not exist");
    }
}
