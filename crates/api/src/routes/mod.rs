//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{auth_middleware, require_admin},
};

pub mod apps;
pub mod content;
pub mod dashboard;
pub mod health;
pub mod messages;
pub mod profile;
pub mod uploads;

/// Creates the API router; admin and profile routes get their middleware here.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Layers run outermost-last: the token is validated before the role check.
    let admin_routes = Router::new()
        .merge(apps::admin_routes())
        .merge(uploads::routes(&state.upload))
        .merge(content::admin_routes())
        .merge(messages::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let authenticated_routes = profile::routes().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new()
        .merge(health::routes())
        .merge(apps::public_routes())
        .merge(content::public_routes())
        .merge(admin_routes)
        .merge(authenticated_routes)
}
