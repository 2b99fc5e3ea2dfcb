//! Upload validation rules.
//!
//! Checks run in a fixed order (file, owner, extension, size) and all of them
//! complete before any side effect.

use bytes::Bytes;

use super::error::UploadError;
use super::types::UploadRequest;
use crate::catalog::FileType;
use crate::storage::BlobKind;
use folio_shared::types::AppId;

/// Largest accepted package: 500 MiB.
pub const PACKAGE_MAX_BYTES: u64 = 500 * 1024 * 1024;
/// Largest accepted image: 10 MiB.
pub const IMAGE_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Accepted package extensions.
pub const PACKAGE_EXTENSIONS: &[&str] = &["apk", "ipa"];
/// Accepted image extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Size ceiling for a blob kind.
#[must_use]
pub const fn max_bytes(kind: BlobKind) -> u64 {
    match kind {
        BlobKind::Package => PACKAGE_MAX_BYTES,
        BlobKind::Image => IMAGE_MAX_BYTES,
    }
}

const fn allowed_extensions(kind: BlobKind) -> &'static [&'static str] {
    match kind {
        BlobKind::Package => PACKAGE_EXTENSIONS,
        BlobKind::Image => IMAGE_EXTENSIONS,
    }
}

/// Message for a file over the size ceiling.
#[must_use]
pub const fn size_limit_message(kind: BlobKind) -> &'static str {
    match kind {
        BlobKind::Package => "File size exceeds 500MB limit",
        BlobKind::Image => "File size exceeds 10MB limit",
    }
}

const fn missing_app_message(kind: BlobKind) -> &'static str {
    match kind {
        BlobKind::Package => "App ID is required. Please save the app first, then upload the file.",
        BlobKind::Image => "App ID is required. Please save the app first, then upload the image.",
    }
}

const fn bad_extension_message(kind: BlobKind) -> &'static str {
    match kind {
        BlobKind::Package => "Invalid file type. Only .apk and .ipa files are allowed.",
        BlobKind::Image => "Invalid file type. Only image files (JPG, PNG, WebP, GIF) are allowed.",
    }
}

fn content_type_for(kind: BlobKind, extension: &str) -> &'static str {
    match (kind, extension) {
        (BlobKind::Package, "apk") => FileType::Apk.content_type(),
        (BlobKind::Image, "jpg" | "jpeg") => "image/jpeg",
        (BlobKind::Image, "png") => "image/png",
        (BlobKind::Image, "webp") => "image/webp",
        (BlobKind::Image, "gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// An upload that passed every check.
#[derive(Debug, Clone)]
pub struct ValidUpload {
    /// Package or image.
    pub kind: BlobKind,
    /// Owning app.
    pub app_id: AppId,
    /// Original file name.
    pub file_name: String,
    /// File contents.
    pub data: Bytes,
    /// Package type, for packages.
    pub file_type: Option<FileType>,
    /// MIME type to store with the object.
    pub content_type: &'static str,
}

impl ValidUpload {
    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Validate an upload request.
///
/// # Errors
///
/// Returns `UploadError::Invalid` with a user-facing message for the first
/// failed check.
pub fn validate(request: UploadRequest) -> Result<ValidUpload, UploadError> {
    let kind = request.kind;

    let Some(file) = request.file else {
        return Err(UploadError::Invalid("No file provided".into()));
    };
    let Some(app_id) = request.app_id else {
        return Err(UploadError::Invalid(missing_app_message(kind).into()));
    };

    let extension = file
        .extension()
        .filter(|ext| allowed_extensions(kind).contains(&ext.as_str()))
        .ok_or_else(|| UploadError::Invalid(bad_extension_message(kind).into()))?;

    if file.size() > max_bytes(kind) {
        return Err(UploadError::Invalid(size_limit_message(kind).into()));
    }

    let file_type = match kind {
        BlobKind::Package => FileType::from_extension(&extension),
        BlobKind::Image => None,
    };

    Ok(ValidUpload {
        kind,
        app_id,
        content_type: content_type_for(kind, &extension),
        file_name: file.name,
        data: file.data,
        file_type,
    })
}
