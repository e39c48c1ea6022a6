use axum::Router;

use crate::state::AppState;

pub mod auth_routes;
pub mod vote_routes;

/// Full API surface minus the process-level layers (CORS, tracing), so the
/// integration tests can drive the exact router the binary serves.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth_routes::auth_routes(state.clone()))
        .nest("/api/votes", vote_routes::vote_routes(state))
}
