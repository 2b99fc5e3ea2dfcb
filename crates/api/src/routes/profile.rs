//! Profile routes for any signed-in user.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use folio_core::auth::UserRole;
use folio_db::{UserRepository, entities::users, repositories::to_principal};
use folio_shared::AppError;
use folio_shared::auth::UpdateProfileRequest;

/// Creates the profile routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// Profile response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: Option<String>,
    /// Display name.
    pub full_name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for ProfileResponse {
    fn from(model: users::Model) -> Self {
        let created_at = model.created_at.with_timezone(&Utc);
        let (full_name, avatar_url) = (model.full_name.clone(), model.avatar_url.clone());
        let principal = to_principal(model);
        Self {
            id: principal.user_id.into_inner(),
            email: principal.email,
            full_name,
            avatar_url,
            role: principal.role,
            created_at,
        }
    }
}

/// GET `/profile`
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let repo = UserRepository::new(Arc::clone(&state.db));
    let profile = repo
        .ensure_profile(auth.user_id(), auth.email(), &state.admin_allowlist)
        .await?;
    Ok(Json(profile.into()))
}

/// PUT `/profile`
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let repo = UserRepository::new(Arc::clone(&state.db));
    repo.ensure_profile(auth.user_id(), auth.email(), &state.admin_allowlist)
        .await?;

    let full_name = body.full_name.map(|n| n.trim().to_string());
    let profile = repo
        .update_profile(auth.user_id(), full_name, body.avatar_url)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("Profile not found".to_string())))?;
    Ok(Json(profile.into()))
}
