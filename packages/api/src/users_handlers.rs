// ABOUTME: HTTP request handlers for user operations
// ABOUTME: Public account registration with field-level validation

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tasklane_core::FieldErrors;
use tasklane_storage::StorageError;
use tracing::info;

use super::response::{ApiError, ApiResult};
use super::serializers::{RegistrationPayload, DUPLICATE_USERNAME_MESSAGE};
use super::state::AppState;

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(payload) = payload?;
    let requested = payload.username.as_deref().map(|u| u.trim().to_string());

    let validated = payload.validate();

    // A taken username is reported together with any other field errors
    let taken = match (&validated, requested) {
        (Err(errors), _) if errors.contains("username") => false,
        (_, Some(username)) => state.user_storage.username_exists(&username).await?,
        (_, None) => false,
    };

    let input = match validated {
        Ok(input) if !taken => input,
        Ok(_) => return Err(FieldErrors::single("username", DUPLICATE_USERNAME_MESSAGE).into()),
        Err(mut errors) => {
            if taken {
                errors.add("username", DUPLICATE_USERNAME_MESSAGE);
            }
            return Err(errors.into());
        }
    };

    info!("Registering user: {}", input.username);

    match state.user_storage.create_user(input).await {
        Ok(user) => info!("Registered user {} ({})", user.username, user.id),
        // Lost a race with a concurrent registration of the same name
        Err(StorageError::Duplicate(_)) => {
            return Err(FieldErrors::single("username", DUPLICATE_USERNAME_MESSAGE).into())
        }
        Err(e) => return Err(ApiError::from(e)),
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}
