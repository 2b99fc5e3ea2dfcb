//! Package and image upload routes.
//!
//! The multipart body is buffered field by field. A file larger than the
//! ceiling for its kind stops being buffered as soon as the ceiling is
//! passed; the request is then validated against an empty stand-in so the
//! usual check order still decides which error is reported. When the body
//! limit cuts the form off before `appId` arrives, the size error wins.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use super::apps::parse_app_id;
use crate::{AppState, error::ApiError, middleware::AdminUser};
use folio_core::catalog::FileType;
use folio_core::storage::BlobKind;
use folio_core::upload::{
    IncomingFile, UploadOutcome, UploadRequest, max_bytes, size_limit_message, validate,
};
use folio_shared::AppError;
use folio_shared::config::UploadConfig;
use folio_shared::types::AppId;

/// Headroom for multipart framing and the `appId` field.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Creates the upload routes (requires admin middleware to be applied externally).
pub fn routes(config: &UploadConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/apps/upload",
            post(upload_package)
                .layer::<_, Infallible>(body_limit(BlobKind::Package))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.package_timeout_secs,
                ))),
        )
        .route(
            "/apps/upload-image",
            post(upload_image)
                .delete(remove_image)
                .layer::<_, Infallible>(body_limit(BlobKind::Image))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.image_timeout_secs,
                ))),
        )
}

fn body_limit(kind: BlobKind) -> DefaultBodyLimit {
    let ceiling = usize::try_from(max_bytes(kind)).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(ceiling.saturating_add(MULTIPART_OVERHEAD))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Successful upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always true.
    pub success: bool,
    /// Object key.
    pub file_path: String,
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Package type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    /// Public URL of the blob.
    pub public_url: String,
    /// Set when a missing column was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        Self {
            success: true,
            file_path: outcome.file_path,
            file_name: outcome.file_name,
            file_size: outcome.file_size,
            file_type: outcome.file_type,
            public_url: outcome.public_url,
            warning: outcome.warning,
        }
    }
}

/// Query for image removal.
#[derive(Debug, Deserialize)]
pub struct RemoveImageQuery {
    /// App whose image is removed.
    #[serde(rename = "appId")]
    pub app_id: Option<String>,
}

// ============================================================================
// Multipart
// ============================================================================

/// Fields collected from an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<IncomingFile>,
    app_id: Option<String>,
    oversized: bool,
    /// The body ended early, so fields after the file were never seen.
    truncated: bool,
}

impl UploadForm {
    async fn read(multipart: &mut Multipart, kind: BlobKind) -> Result<Self, ApiError> {
        let ceiling = usize::try_from(max_bytes(kind)).unwrap_or(usize::MAX);
        let mut form = Self::default();

        loop {
            let mut field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                // The body limit can trip while skipping the rest of an
                // oversized file; what was read so far is enough to answer.
                Err(_) if form.oversized => {
                    form.truncated = true;
                    break;
                }
                Err(e) => return Err(multipart_error(&e, kind)),
            };

            let field_name = field.name().map(str::to_string);
            match field_name.as_deref() {
                Some("file") => {
                    let name = field.file_name().unwrap_or_default().to_string();
                    let mut data = BytesMut::new();
                    while let Some(chunk) = field
                        .chunk()
                        .await
                        .map_err(|e| multipart_error(&e, kind))?
                    {
                        if data.len() + chunk.len() > ceiling {
                            form.oversized = true;
                            break;
                        }
                        data.extend_from_slice(&chunk);
                    }
                    if !name.is_empty() {
                        form.file = Some(IncomingFile::new(name, data.freeze()));
                    }
                }
                Some("appId") => {
                    let text = field.text().await.map_err(|e| multipart_error(&e, kind))?;
                    form.app_id = Some(text);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn into_request(self, kind: BlobKind) -> Result<UploadRequest, ApiError> {
        let app_id = self
            .app_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(parse_app_id)
            .transpose()?;

        let request = |file| match kind {
            BlobKind::Package => UploadRequest::package(app_id, file),
            BlobKind::Image => UploadRequest::image(app_id, file),
        };

        if self.oversized && self.truncated && app_id.is_none() {
            return Err(size_limit_error(kind));
        }
        if self.oversized {
            let stand_in = self
                .file
                .map(|f| IncomingFile::new(f.name, bytes::Bytes::new()));
            validate(request(stand_in))?;
            return Err(size_limit_error(kind));
        }
        Ok(request(self.file))
    }
}

fn size_limit_error(kind: BlobKind) -> ApiError {
    ApiError(AppError::Validation(size_limit_message(kind).to_string()))
}

fn multipart_error(err: &MultipartError, kind: BlobKind) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        size_limit_error(kind)
    } else {
        ApiError(AppError::Validation(err.body_text()))
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn handle_upload(
    state: &AppState,
    admin: &AdminUser,
    mut multipart: Multipart,
    kind: BlobKind,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = UploadForm::read(&mut multipart, kind).await?;
    let request = form.into_request(kind)?;
    let outcome = state.uploads().upload(request).await?;
    info!(
        kind = kind.label(),
        path = %outcome.file_path,
        user_id = %admin.0.user_id,
        "Upload stored"
    );
    Ok(Json(outcome.into()))
}

/// POST `/apps/upload`
async fn upload_package(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    handle_upload(&state, &admin, multipart, BlobKind::Package).await
}

/// POST `/apps/upload-image`
async fn upload_image(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    handle_upload(&state, &admin, multipart, BlobKind::Image).await
}

/// DELETE `/apps/upload-image?appId=...`
async fn remove_image(
    State(state): State<AppState>,
    Query(query): Query<RemoveImageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let app_id: AppId = query
        .app_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(parse_app_id)
        .transpose()?
        .ok_or_else(|| ApiError(AppError::Validation("App ID is required".to_string())))?;

    state.uploads().remove_image(app_id).await?;
    Ok(Json(json!({ "success": true })))
}
