// ABOUTME: HTTP API layer for Tasklane providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod response;
pub mod serializers;
pub mod state;
pub mod tasks_handlers;
pub mod token_handlers;
pub mod users_handlers;

pub use response::{ApiError, ApiResult};
pub use state::AppState;

/// Creates the tasks API router
pub fn create_tasks_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tasks/",
            get(tasks_handlers::list_tasks).post(tasks_handlers::create_task),
        )
        .route(
            "/api/tasks/{task_id}/",
            get(tasks_handlers::get_task)
                .put(tasks_handlers::replace_task)
                .delete(tasks_handlers::delete_task),
        )
}

/// Creates the public account and token router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/api/register/", post(users_handlers::register))
        .route("/api/login/", post(token_handlers::login))
        .route("/api/login/refresh/", post(token_handlers::refresh))
}

/// All API routes with state applied
pub fn create_router(state: AppState) -> Router {
    create_tasks_router()
        .merge(create_auth_router())
        .with_state(state)
}
