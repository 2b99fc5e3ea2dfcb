//! Site content routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AdminUser};
use folio_core::content::{SectionUpdate, SiteContent, SiteSection};
use folio_db::SiteContentRepository;
use folio_shared::AppError;

/// Public content routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/content", get(list_sections))
        .route("/content/{section}", get(get_section))
}

/// Admin content routes (requires admin middleware to be applied externally).
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/content/{section}", axum::routing::put(update_section))
}

/// GET `/content`
async fn list_sections(State(state): State<AppState>) -> Result<Json<Vec<SiteContent>>, ApiError> {
    let repo = SiteContentRepository::new(Arc::clone(&state.db));
    Ok(Json(repo.list().await?))
}

/// GET `/content/{section}`
async fn get_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<SiteContent>, ApiError> {
    let section: SiteSection = section.parse()?;
    let repo = SiteContentRepository::new(Arc::clone(&state.db));
    repo.find(section)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError(AppError::NotFound("Section not found".to_string())))
}

/// PUT `/content/{section}`
///
/// Merges the update into the stored section.
async fn update_section(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(section): Path<String>,
    Json(update): Json<SectionUpdate>,
) -> Result<Json<SiteContent>, ApiError> {
    let section: SiteSection = section.parse()?;
    let repo = SiteContentRepository::new(Arc::clone(&state.db));

    let current = repo.find(section).await?.unwrap_or_else(|| SiteContent {
        section_name: section,
        title: None,
        subtitle: None,
        content: json!({}),
        updated_at: Utc::now(),
    });

    let saved = repo.save(update.apply(&current)?).await?;
    info!(section = %section, user_id = %admin.user_id, "Updated site content");
    Ok(Json(saved))
}
