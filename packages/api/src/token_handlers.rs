// ABOUTME: HTTP request handlers for token issuance
// ABOUTME: Exchanges credentials for an access/refresh pair and refresh tokens for access tokens

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tasklane_security::TokenPair;
use tracing::{info, warn};

use super::response::{ApiError, ApiResult};
use super::serializers::{LoginPayload, RefreshPayload};
use super::state::AppState;

/// Issue an access/refresh pair for valid credentials
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let Json(payload) = payload?;
    let (username, password) = payload.validate()?;

    let Some(user) = state
        .user_storage
        .authenticate(&username, &password)
        .await?
    else {
        warn!("Failed login for {}", username);
        return Err(ApiError::InvalidCredentials);
    };

    info!("Issuing tokens for {}", user.username);

    let pair = state
        .jwt
        .issue_pair(&user)
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;
    let refresh_token = payload.validate()?;

    let access = state.jwt.refresh_access(&refresh_token).map_err(|e| {
        warn!("Rejected refresh token: {}", e);
        ApiError::InvalidRefreshToken
    })?;

    info!("Refreshed access token");
    Ok(Json(json!({ "access": access })))
}
