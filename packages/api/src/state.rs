// ABOUTME: Shared application state injected into every handler
// ABOUTME: Holds the storage objects and the token service

use std::sync::Arc;

use sqlx::SqlitePool;
use tasklane_security::{JwtConfig, JwtService, UserStorage};
use tasklane_tags::TagStorage;
use tasklane_tasks::TaskStorage;

/// Built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub task_storage: Arc<TaskStorage>,
    pub tag_storage: Arc<TagStorage>,
    pub user_storage: Arc<UserStorage>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_config: &JwtConfig) -> Self {
        Self {
            task_storage: Arc::new(TaskStorage::new(pool.clone())),
            tag_storage: Arc::new(TagStorage::new(pool.clone())),
            user_storage: Arc::new(UserStorage::new(pool)),
            jwt: Arc::new(JwtService::new(jwt_config)),
        }
    }
}
