//! Admin dashboard routes.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{AppState, error::ApiError};
use folio_db::DashboardRepository;

/// Creates the dashboard routes (requires admin middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/stats", get(get_stats))
}

/// Response for dashboard stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// All visitor messages.
    pub total_messages: u64,
    /// Messages awaiting a reply.
    pub unreplied_messages: u64,
    /// Messages with a reply.
    pub replied_messages: u64,
    /// Apps in the catalog.
    pub total_apps: u64,
}

/// GET `/admin/stats`
async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = DashboardRepository::new(Arc::clone(&state.db)).stats().await?;
    Ok(Json(StatsResponse {
        total_messages: stats.total_messages,
        unreplied_messages: stats.unreplied_messages,
        replied_messages: stats.replied_messages(),
        total_apps: stats.total_apps,
    }))
}
