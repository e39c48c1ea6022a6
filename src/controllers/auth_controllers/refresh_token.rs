use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::controllers::auth_controllers::{append_cookie, auth_cookie};
use crate::db::refresh_store::RefreshStatus;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::tokens::{token_digest, TokenError, ACCESS_COOKIE, REFRESH_COOKIE};

/// Exchanges a refresh token for a fresh access token. The token must pass
/// both the signature/expiry check and the server-side status lookup; a
/// revoked or unknown token is rejected even if its JWT is still valid.
pub async fn refresh_token(
    State(state): State<AppState>,
    cookie_jar: CookieJar,
) -> AppResult<Response> {
    let token = cookie_jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| {
            AppError::AuthenticationError("Not authorized, no refresh token".to_string())
        })?;

    let claims = state.tokens.verify_refresh(&token).map_err(|e| {
        AppError::AuthenticationError(match e {
            TokenError::Expired => "Refresh token expired. Please log in again.".to_string(),
            TokenError::Invalid => "Not authorized, token failed".to_string(),
        })
    })?;

    match state.refresh_tokens.status(&token_digest(&token)).await? {
        RefreshStatus::Valid(user_id) if user_id.to_hex() == claims.sub => {}
        _ => {
            return Err(AppError::AuthenticationError(
                "Not authorized, token failed".to_string(),
            ));
        }
    }

    let access = state
        .tokens
        .issue_access(&claims.sub)
        .map_err(|_| AppError::InternalError("Failed to create access token".to_string()))?;

    let mut response = Json(json!({ "message": "Access token refreshed" })).into_response();
    append_cookie(
        &mut response,
        &auth_cookie(ACCESS_COOKIE, &access, state.tokens.access_max_age()),
    )?;

    Ok(response)
}
