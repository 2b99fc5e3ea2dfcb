//! JSON error responses.
//!
//! Every error body is `{"error": "<message>"}`; the status comes from the
//! shared [`AppError`] taxonomy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use folio_core::catalog::CatalogError;
use folio_core::content::ContentError;
use folio_core::download::DownloadError;
use folio_core::inbox::InboxError;
use folio_core::upload::UploadError;
use folio_shared::AppError;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        Self(match err {
            UploadError::Invalid(message) => AppError::Validation(message),
            UploadError::OwnerMissing(_) => AppError::Validation(err.to_string()),
            UploadError::AppNotFound(_) => AppError::NotFound(err.to_string()),
            UploadError::Storage(e) => AppError::Storage(format!("Upload failed: {e}")),
            UploadError::Record(e) => AppError::Database(format!("Failed to update app: {e}")),
        })
    }
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        Self(match err {
            DownloadError::AppNotFound | DownloadError::FileNotFound | DownloadError::NoDownload => {
                AppError::NotFound(err.to_string())
            }
            DownloadError::Storage(e) => AppError::Storage(e.to_string()),
            DownloadError::Record(e) => AppError::Database(e.to_string()),
        })
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(match err {
            CatalogError::NotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::Validation(message) => AppError::Validation(message),
            CatalogError::Record(e) => AppError::Database(e.to_string()),
        })
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        Self(match err {
            ContentError::UnknownSection(_) => AppError::NotFound(err.to_string()),
            ContentError::InvalidContent(_) => AppError::Validation(err.to_string()),
        })
    }
}

impl From<InboxError> for ApiError {
    fn from(err: InboxError) -> Self {
        Self(match err {
            InboxError::NotFound => AppError::NotFound(err.to_string()),
            InboxError::EmptyResponse => AppError::Validation(err.to_string()),
            InboxError::AlreadyReplied => AppError::Conflict(err.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::catalog::{AppField, RecordStoreError};
    use folio_core::storage::StorageError;
    use folio_shared::types::AppId;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation("File type not allowed".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Unauthorized("Unauthorized".into()), StatusCode::UNAUTHORIZED)]
    #[case(AppError::Forbidden("Forbidden".into()), StatusCode::FORBIDDEN)]
    #[case(AppError::Conflict("Already replied".into()), StatusCode::CONFLICT)]
    #[case(AppError::Storage("bucket gone".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_response_status(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(ApiError(err).into_response().status(), expected);
    }

    #[test]
    fn test_owner_missing_is_bad_request() {
        let err = ApiError::from(UploadError::OwnerMissing(AppId::new()));
        assert_eq!(err.inner().status_code(), 400);
        assert!(err.inner().to_string().starts_with("owner required"));
    }

    #[test]
    fn test_upload_backend_failures_are_prefixed() {
        let err = ApiError::from(UploadError::Storage(StorageError::operation("bucket gone")));
        assert_eq!(err.inner().status_code(), 500);
        assert!(err.inner().to_string().starts_with("Upload failed: "));

        let err = ApiError::from(UploadError::Record(RecordStoreError::MissingField(
            AppField::FilePath,
        )));
        assert_eq!(
            err.inner().to_string(),
            "Failed to update app: column \"file_path\" does not exist"
        );
    }

    #[test]
    fn test_second_reply_is_conflict() {
        let err = ApiError::from(InboxError::AlreadyReplied);
        assert_eq!(err.inner().status_code(), 409);
    }

    #[test]
    fn test_no_download_is_not_found() {
        let err = ApiError::from(DownloadError::NoDownload);
        assert_eq!(err.inner().status_code(), 404);
        assert_eq!(err.inner().to_string(), "No download available for this app");
    }
}
