// ABOUTME: HTTP request handlers for task operations
// ABOUTME: List, create, retrieve, replace and delete tasks for authenticated callers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tasklane_tasks::TaskFilter;
use tracing::info;

use super::auth::CurrentUser;
use super::response::{ApiError, ApiResult};
use super::serializers::{parse_status_filter, TaskPayload, TaskResponse};
use super::state::AppState;

/// Path ids that are not integers cannot name a task
fn parse_task_id(raw: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
}

/// List all tasks, optionally narrowed to one status
pub async fn list_tasks(
    State(state): State<AppState>,
    current_user: CurrentUser,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let Query(query) = query?;
    info!(
        "Listing tasks for {} (status filter: {:?})",
        current_user.username, query.status
    );

    let filter = TaskFilter {
        status: parse_status_filter(query.status.as_deref())?,
    };

    let tasks = state.task_storage.list_tasks(&filter).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Create a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let Json(payload) = payload?;
    let input = payload.validate_create()?;

    info!(
        "Creating task '{}' for user {}",
        input.title, current_user.username
    );

    let task = state
        .task_storage
        .create_task(current_user.id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Get a single task by ID
pub async fn get_task(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    info!("Getting task: {}", task_id);

    let task_id = parse_task_id(&task_id)?;
    let task = state.task_storage.get_task(task_id).await?;
    Ok(Json(task.into()))
}

/// Replace a task's mutable fields
pub async fn replace_task(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(task_id): Path<String>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    info!("Replacing task: {}", task_id);

    let task_id = parse_task_id(&task_id)?;
    // Unknown ids are reported before any payload problem
    state.task_storage.get_task(task_id).await?;

    let Json(payload) = payload?;
    let input = payload.validate_replace()?;

    let task = state.task_storage.replace_task(task_id, input).await?;
    Ok(Json(task.into()))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("Deleting task: {}", task_id);

    let task_id = parse_task_id(&task_id)?;
    state.task_storage.delete_task(task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
