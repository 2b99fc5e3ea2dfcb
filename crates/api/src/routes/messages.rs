//! Inbox routes: list, reply, delete.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AdminUser};
use folio_core::inbox::{InboxError, Message, prepare_reply};
use folio_db::{MessageRepository, repositories::ReplyOutcome};
use folio_shared::AppError;
use folio_shared::types::{MessageId, PageRequest, PageResponse};

/// Creates the message routes (requires admin middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages))
        .route("/messages/{id}/reply", post(reply_to_message))
        .route("/messages/{id}", delete(delete_message))
}

/// Request body for a reply.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    /// Reply text.
    pub response: String,
}

fn parse_message_id(raw: &str) -> Result<MessageId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::Validation("Invalid message ID".to_string())))
}

/// GET `/messages?page&per_page`
async fn list_messages(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<Message>>, ApiError> {
    let page = page.normalized();
    let repo = MessageRepository::new(Arc::clone(&state.db));
    let (messages, total) = repo.list(&page).await?;
    Ok(Json(PageResponse::new(messages, page.page, page.per_page, total)))
}

/// POST `/messages/{id}/reply`
async fn reply_to_message(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<ReplyRequest>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_message_id(&id)?;
    let repo = MessageRepository::new(Arc::clone(&state.db));

    let message = repo.find_by_id(id).await?.ok_or(InboxError::NotFound)?;
    let response = prepare_reply(&message, &body.response)?;

    match repo.reply(id, &response).await? {
        ReplyOutcome::Replied(message) => {
            info!(message_id = %id, user_id = %admin.user_id, "Replied to message");
            Ok(Json(message))
        }
        ReplyOutcome::AlreadyReplied => Err(InboxError::AlreadyReplied.into()),
        ReplyOutcome::NotFound => Err(InboxError::NotFound.into()),
    }
}

/// DELETE `/messages/{id}`
async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_message_id(&id)?;
    let repo = MessageRepository::new(Arc::clone(&state.db));
    if !repo.delete(id).await? {
        return Err(InboxError::NotFound.into());
    }
    Ok(Json(json!({ "success": true })))
}
