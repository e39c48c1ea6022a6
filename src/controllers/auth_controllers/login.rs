use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::controllers::auth_controllers::models::{AuthResponse, LoginRequest, UserResponse};
use crate::controllers::auth_controllers::{append_session_cookies, issue_session};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::password;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    let email = body.email.trim().to_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("Invalid email or password".to_string()))?;

    if !password::verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::AuthenticationError(
            "Invalid email or password".to_string(),
        ));
    }

    let (access, refresh) = issue_session(&state, user.id).await?;

    let mut response = Json(AuthResponse {
        message: "Logged in successfully".to_string(),
        user: UserResponse::from_user(&user),
    })
    .into_response();

    append_session_cookies(&mut response, &state, &access, &refresh)?;

    Ok(response)
}
