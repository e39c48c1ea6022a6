use axum::{routing::post, Router};

use crate::controllers::auth_controllers::{login, logout, refresh_token, signup};
use crate::state::AppState;

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/refresh-token", post(refresh_token::refresh_token))
        .with_state(state)
}
