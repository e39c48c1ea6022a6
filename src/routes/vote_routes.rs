use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::controllers::poll_controllers::{cast_vote, create_poll, get_results};
use crate::middleware::auth::auth_gate;
use crate::state::AppState;

pub fn vote_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", post(create_poll::create_poll))
        .route("/:pollId/cast", post(cast_vote::cast_vote))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate));

    Router::new()
        .merge(protected)
        .route("/:pollId/results", get(get_results::get_results))
        .with_state(state)
}
