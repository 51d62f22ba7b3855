// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves the bearer access token into the calling user or rejects with 403

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tasklane_security::TokenType;
use tracing::warn;

use crate::response::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer";

/// Current authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Err(ApiError::NotAuthenticated);
        };

        let header = header.to_str().map_err(|_| ApiError::InvalidToken)?;
        let mut pieces = header.split_whitespace();

        // Other schemes are treated as if no credentials were sent
        if pieces.next() != Some(BEARER_PREFIX) {
            return Err(ApiError::NotAuthenticated);
        }

        let token = match (pieces.next(), pieces.next()) {
            (Some(token), None) => token,
            _ => return Err(ApiError::InvalidToken),
        };

        let claims = state
            .jwt
            .verify(token, TokenType::Access)
            .map_err(|e| {
                warn!("Rejected access token: {}", e);
                ApiError::InvalidToken
            })?;
        let user_id = claims.user_id().map_err(|_| ApiError::InvalidToken)?;

        let user = match state.user_storage.get_user(user_id).await {
            Ok(user) => user,
            Err(tasklane_storage::StorageError::NotFound) => {
                warn!("Access token for unknown user {}", user_id);
                return Err(ApiError::InvalidToken);
            }
            Err(e) => return Err(e.into()),
        };

        if !user.is_active {
            warn!("Access token for inactive user {}", user.username);
            return Err(ApiError::InvalidToken);
        }

        Ok(Self {
            id: user.id,
            username: user.username,
        })
    }
}
