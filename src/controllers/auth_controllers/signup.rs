use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::controllers::auth_controllers::models::{AuthResponse, SignupRequest, UserResponse};
use crate::controllers::auth_controllers::{append_session_cookies, issue_session};
use crate::models::user_models::User;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::password;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<Response> {
    let name = body.name.trim().to_string();
    let email = body.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }
    if email.is_empty() {
        return Err(AppError::ValidationError("Email is required".to_string()));
    }
    if body.password.len() < 6 {
        return Err(AppError::ValidationError(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    // Hashing happens here, as a step of this operation, before anything is
    // persisted.
    let password_hash = password::hash_password(&body.password)?;

    let now = Utc::now();
    let user = User {
        id: ObjectId::new(),
        name,
        email,
        password_hash,
        created_at: now,
        updated_at: now,
    };

    state.users.insert_user(&user).await?;

    let (access, refresh) = issue_session(&state, user.id).await?;

    let mut response = (
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user: UserResponse::from_user(&user),
        }),
    )
        .into_response();

    append_session_cookies(&mut response, &state, &access, &refresh)?;

    Ok(response)
}
