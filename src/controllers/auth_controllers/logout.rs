use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::controllers::auth_controllers::{append_cookie, clear_cookie};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::tokens::{token_digest, ACCESS_COOKIE, REFRESH_COOKIE};

pub async fn logout(State(state): State<AppState>, cookie_jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = cookie_jar.get(REFRESH_COOKIE) {
        state
            .refresh_tokens
            .revoke(&token_digest(cookie.value()))
            .await?;
    }

    let mut response = Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
    .into_response();

    append_cookie(&mut response, &clear_cookie(ACCESS_COOKIE))?;
    append_cookie(&mut response, &clear_cookie(REFRESH_COOKIE))?;

    Ok(response)
}
