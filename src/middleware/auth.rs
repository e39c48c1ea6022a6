use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::oid::ObjectId;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::tokens::{TokenGateState, ACCESS_COOKIE, REFRESH_COOKIE};

/// Identity attached to the request once the gate admits it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
}

/// Classifies the presented token set and either attaches `AuthUser` or
/// rejects. An expired (or missing) access token alongside a refresh cookie
/// answers with `requiresRefresh: true` so the client runs the refresh
/// exchange instead of a full re-login. The gate never refreshes itself.
pub async fn auth_gate(
    State(state): State<AppState>,
    cookie_jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access = cookie_jar
        .get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let has_refresh = cookie_jar.get(REFRESH_COOKIE).is_some();

    match state.tokens.classify(access.as_deref(), has_refresh) {
        TokenGateState::ValidAccess(claims) => {
            let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| {
                AppError::AuthenticationError("Not authorized, token failed".to_string())
            })?;
            req.extensions_mut().insert(AuthUser { user_id });
            Ok(next.run(req).await)
        }
        TokenGateState::ExpiredAccessWithRefresh => Err(AppError::RefreshRequired(
            "Access token expired or missing. Please refresh.".to_string(),
        )),
        TokenGateState::NoToken => Err(AppError::AuthenticationError(
            "Not authorized, no token".to_string(),
        )),
        TokenGateState::ExpiredAccessNoRefresh | TokenGateState::InvalidAccess => Err(
            AppError::AuthenticationError("Not authorized, token failed".to_string()),
        ),
    }
}
