//! App catalog routes and the download resolver.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AdminUser};
use folio_core::catalog::{App, AppUpdate, NewApp};
use folio_core::download::{CACHE_CONTROL, Download, content_disposition};
use folio_shared::AppError;
use folio_shared::types::AppId;

/// Public catalog routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/apps", get(list_apps))
        .route("/apps/download", get(download))
        .route("/apps/{id}", get(get_app))
}

/// Admin catalog routes (requires admin middleware to be applied externally).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/apps", axum::routing::post(create_app))
        .route(
            "/apps/{id}",
            axum::routing::put(update_app).delete(delete_app),
        )
}

/// Query for the download endpoint.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// App to download.
    #[serde(rename = "appId")]
    pub app_id: Option<String>,
}

/// Parses an app ID from a path or query value.
pub(crate) fn parse_app_id(raw: &str) -> Result<AppId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::Validation("Invalid app ID".to_string())))
}

/// GET `/apps`
async fn list_apps(State(state): State<AppState>) -> Result<Json<Vec<App>>, ApiError> {
    Ok(Json(state.catalog().list().await?))
}

/// GET `/apps/{id}`
async fn get_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<App>, ApiError> {
    let id = parse_app_id(&id)?;
    Ok(Json(state.catalog().get(id).await?))
}

/// POST `/apps`
async fn create_app(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(input): Json<NewApp>,
) -> Result<impl IntoResponse, ApiError> {
    let app = state.catalog().create(input).await?;
    info!(app_id = %app.id, user_id = %admin.user_id, "Created app");
    Ok((StatusCode::CREATED, Json(app)))
}

/// PUT `/apps/{id}`
async fn update_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<AppUpdate>,
) -> Result<Json<App>, ApiError> {
    let id = parse_app_id(&id)?;
    Ok(Json(state.catalog().update(id, update).await?))
}

/// DELETE `/apps/{id}`
async fn delete_app(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_app_id(&id)?;
    state.catalog().delete(id).await?;
    info!(app_id = %id, user_id = %admin.user_id, "Deleted app");
    Ok(Json(json!({ "success": true })))
}

/// GET `/apps/download?appId=...`
///
/// Streams the stored package, or redirects to the external link.
async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let raw = query
        .app_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError(AppError::Validation("App ID is required".to_string())))?;
    let app_id = parse_app_id(raw)?;

    match state.downloads().resolve(app_id).await? {
        Download::Stream(file) => {
            let length = file.bytes.len();
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, file.content_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        content_disposition(&file.file_name),
                    ),
                    (header::CONTENT_LENGTH, length.to_string()),
                    (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
                ],
                Body::from(file.bytes),
            )
                .into_response())
        }
        Download::Redirect(url) => Ok(Redirect::temporary(&url).into_response()),
    }
}
