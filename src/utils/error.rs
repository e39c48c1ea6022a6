use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "requiresRefresh", skip_serializing_if = "Option::is_none")]
    pub requires_refresh: Option<bool>,
}

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFound(String),
    AlreadyVoted(String),
    InvalidChoice(String),
    DuplicateQuestion(String),
    UpdateConflict(String),
    AuthenticationError(String),
    RefreshRequired(String),
    DatabaseError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::AlreadyVoted(msg) => write!(f, "Already voted: {}", msg),
            AppError::InvalidChoice(msg) => write!(f, "Invalid choice: {}", msg),
            AppError::DuplicateQuestion(msg) => write!(f, "Duplicate question: {}", msg),
            AppError::UpdateConflict(msg) => write!(f, "Update conflict: {}", msg),
            AppError::AuthenticationError(msg) => write!(f, "Authentication error: {}", msg),
            AppError::RefreshRequired(msg) => write!(f, "Refresh required: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut requires_refresh = None;

        let (status, error_type, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::AlreadyVoted(msg) => (StatusCode::BAD_REQUEST, "ALREADY_VOTED", msg),
            AppError::InvalidChoice(msg) => (StatusCode::BAD_REQUEST, "INVALID_CHOICE", msg),
            AppError::DuplicateQuestion(msg) => {
                (StatusCode::BAD_REQUEST, "DUPLICATE_QUESTION", msg)
            }
            AppError::UpdateConflict(msg) => {
                error!("vote update conflict: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "UPDATE_CONFLICT", msg)
            }
            AppError::AuthenticationError(msg) => {
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR", msg)
            }
            AppError::RefreshRequired(msg) => {
                requires_refresh = Some(true);
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR", msg)
            }
            AppError::DatabaseError(msg) => {
                error!("database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database operation failed".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            requires_refresh,
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
