//! App catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::BlobKind;
use folio_shared::types::AppId;

/// Installable package type, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Android package.
    Apk,
    /// iOS app archive.
    Ipa,
}

impl FileType {
    /// Parse from a file extension, case-insensitively.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "apk" => Some(Self::Apk),
            "ipa" => Some(Self::Ipa),
            _ => None,
        }
    }

    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apk => "apk",
            Self::Ipa => "ipa",
        }
    }

    /// MIME type served on download.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Apk => "application/vnd.android.package-archive",
            Self::Ipa => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An app in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// App ID.
    pub id: AppId,
    /// Display title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Sort key on the public site.
    pub display_order: i32,
    /// External download URL, or the public URL of the stored package.
    pub download_link: Option<String>,
    /// Object key of the stored package.
    pub file_path: Option<String>,
    /// Original file name of the stored package.
    pub file_name: Option<String>,
    /// Size of the stored package in bytes.
    pub file_size: Option<i64>,
    /// Type of the stored package.
    pub file_type: Option<FileType>,
    /// Object key of the stored image.
    pub image_path: Option<String>,
    /// Public URL of the stored image.
    pub image_url: Option<String>,
    /// Number of served downloads.
    pub download_count: i32,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated timestamp.
    pub updated_at: DateTime<Utc>,
}


/// Blob keys an app record references.
///
/// Read on its own so that upload, image removal and delete never select the
/// optional columns a lagging schema may lack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobRefs {
    /// Object key of the stored package.
    pub file_path: Option<String>,
    /// Object key of the stored image.
    pub image_path: Option<String>,
}

impl BlobRefs {
    /// Object key currently referenced for a blob kind.
    #[must_use]
    pub fn path(&self, kind: BlobKind) -> Option<&str> {
        match kind {
            BlobKind::Package => self.file_path.as_deref(),
            BlobKind::Image => self.image_path.as_deref(),
        }
        .filter(|p| !p.is_empty())
    }
}

/// The package columns a download needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSource {
    /// Object key of the stored package.
    pub file_path: Option<String>,
    /// Original file name of the stored package.
    pub file_name: Option<String>,
    /// Type of the stored package.
    pub file_type: Option<FileType>,
    /// External download URL, or the public URL of the stored package.
    pub download_link: Option<String>,
}

impl DownloadSource {
    /// Object key and file name of the stored package, when both are set.
    #[must_use]
    pub fn stored_file(&self) -> Option<(&str, &str)> {
        match (self.file_path.as_deref(), self.file_name.as_deref()) {
            (Some(path), Some(name)) if !path.is_empty() && !name.is_empty() => Some((path, name)),
            _ => None,
        }
    }
}

impl From<&App> for BlobRefs {
    fn from(app: &App) -> Self {
        Self {
            file_path: app.file_path.clone(),
            image_path: app.image_path.clone(),
        }
    }
}

impl From<&App> for DownloadSource {
    fn from(app: &App) -> Self {
        Self {
            file_path: app.file_path.clone(),
            file_name: app.file_name.clone(),
            file_type: app.file_type,
            download_link: app.download_link.clone(),
        }
    }
}

/// Input for creating an app.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewApp {
    /// Display title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// External download URL.
    #[serde(default)]
    pub download_link: Option<String>,
    /// Sort key; defaults to the current number of apps.
    #[serde(default)]
    pub display_order: Option<i32>,
}

/// Partial update of an app, as sent by the admin form.
///
/// An empty `download_link` clears the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New tags.
    pub tags: Option<Vec<String>>,
    /// New external link; empty string clears it.
    pub download_link: Option<String>,
    /// New sort key.
    pub display_order: Option<i32>,
}

/// Normalised changes handed to the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppChanges {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New tags.
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the link.
    pub download_link: Option<Option<String>>,
    /// New sort key.
    pub display_order: Option<i32>,
}

impl AppChanges {
    /// Whether nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Trims tags and drops empty ones, keeping order.
#[must_use]
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
