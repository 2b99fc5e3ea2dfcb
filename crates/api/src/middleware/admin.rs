//! Admin authorization middleware.
//!
//! Runs after [`auth_middleware`](super::auth_middleware). The caller's
//! profile is ensured (allowlist promotion happens here) and the role is
//! re-read from the users table on every request.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{AppState, error::ApiError};
use folio_core::auth::{AccessDecision, Principal};
use folio_db::{UserRepository, repositories::to_principal};
use folio_shared::{AppError, Claims};

/// Admin principal, available to handlers behind [`require_admin`].
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

async fn decide(state: &AppState, claims: Option<&Claims>) -> Result<AccessDecision, ApiError> {
    let Some(claims) = claims else {
        return Ok(AccessDecision::Unauthenticated);
    };

    let users = UserRepository::new(Arc::clone(&state.db));
    let profile = users
        .ensure_profile(claims.user_id(), claims.email(), &state.admin_allowlist)
        .await?;
    Ok(AccessDecision::for_admin(Some(to_principal(profile))))
}

/// Rejects callers that are not admins.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = request.extensions().get::<Claims>().cloned();

    match decide(&state, claims.as_ref()).await {
        Ok(AccessDecision::Granted(principal)) => {
            debug!(user_id = %principal.user_id, "Admin access granted");
            request.extensions_mut().insert(AdminUser(principal));
            next.run(request).await
        }
        Ok(AccessDecision::Unauthenticated) => {
            ApiError(AppError::Unauthorized("Unauthorized".to_string())).into_response()
        }
        Ok(AccessDecision::Forbidden) => {
            if let Some(claims) = &claims {
                warn!(user_id = %claims.user_id(), "Admin access denied");
            }
            ApiError(AppError::Forbidden(
                "Forbidden: Admin access required".to_string(),
            ))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError(AppError::Forbidden("Forbidden: Admin access required".into())))
    }
}
