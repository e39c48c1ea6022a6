use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::Response;
use mongodb::bson::oid::ObjectId;

use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::tokens::{token_digest, ACCESS_COOKIE, REFRESH_COOKIE};

pub mod login;
pub mod logout;
pub mod models;
pub mod refresh_token;
pub mod signup;

/// Mints an access/refresh pair and records the refresh token's digest so
/// the exchange endpoint can check validity and revocation later.
pub(crate) async fn issue_session(
    state: &AppState,
    user_id: ObjectId,
) -> AppResult<(String, String)> {
    let user_hex = user_id.to_hex();

    let access = state
        .tokens
        .issue_access(&user_hex)
        .map_err(|_| AppError::InternalError("Failed to create access token".to_string()))?;

    let (refresh, jti, expires_at) = state
        .tokens
        .issue_refresh(&user_hex)
        .map_err(|_| AppError::InternalError("Failed to create refresh token".to_string()))?;

    state
        .refresh_tokens
        .save(user_id, &jti, &token_digest(&refresh), expires_at)
        .await?;

    Ok((access, refresh))
}

pub(crate) fn auth_cookie(name: &str, value: &str, max_age: i64) -> String {
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

pub(crate) fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub(crate) fn append_cookie(response: &mut Response, cookie: &str) -> AppResult<()> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|_| AppError::InternalError("Failed to build cookie header".to_string()))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

pub(crate) fn append_session_cookies(
    response: &mut Response,
    state: &AppState,
    access: &str,
    refresh: &str,
) -> AppResult<()> {
    append_cookie(
        response,
        &auth_cookie(ACCESS_COOKIE, access, state.tokens.access_max_age()),
    )?;
    append_cookie(
        response,
        &auth_cookie(REFRESH_COOKIE, refresh, state.tokens.refresh_max_age()),
    )
}
