// ABOUTME: API error type and its mapping onto HTTP responses
// ABOUTME: Every handler failure becomes a status code plus a JSON detail body

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tasklane_core::FieldErrors;
use tasklane_storage::StorageError;
use thiserror::Error;
use tracing::{error, info};

pub const NOT_AUTHENTICATED_DETAIL: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN_DETAIL: &str = "Given token not valid for any token type";
pub const INVALID_CREDENTIALS_DETAIL: &str = "No active account found with the given credentials";
pub const INVALID_REFRESH_DETAIL: &str = "Token is invalid or expired";
pub const NOT_FOUND_DETAIL: &str = "Not found.";
pub const SERVER_ERROR_DETAIL: &str = "A server error occurred.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication credentials were not provided")]
    NotAuthenticated,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Resource not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated | ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::InvalidCredentials | ApiError::InvalidRefreshToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::BadRequest(detail) => json!({ "detail": detail }),
            ApiError::NotAuthenticated => json!({ "detail": NOT_AUTHENTICATED_DETAIL }),
            ApiError::InvalidToken => json!({ "detail": INVALID_TOKEN_DETAIL }),
            ApiError::InvalidCredentials => json!({ "detail": INVALID_CREDENTIALS_DETAIL }),
            ApiError::InvalidRefreshToken => json!({
                "detail": INVALID_REFRESH_DETAIL,
                "code": "token_not_valid",
            }),
            ApiError::NotFound => json!({ "detail": NOT_FOUND_DETAIL }),
            ApiError::Storage(_) | ApiError::Internal(_) => {
                json!({ "detail": SERVER_ERROR_DETAIL })
            }
        };

        // Server faults keep their cause in the log only
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            info!(status = %status.as_u16(), error = %self, "API error response");
        }

        (status, Json(body)).into_response()
    }
}
