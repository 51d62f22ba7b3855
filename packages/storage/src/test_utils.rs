//! Test utilities shared by the storage-backed packages

use sqlx::SqlitePool;

use crate::connect_in_memory;

/// Create an in-memory database with all migrations applied
pub async fn setup_test_db() -> SqlitePool {
    connect_in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Insert a bare user row and return its id. The password hash is a
/// placeholder, so the user cannot log in.
pub async fn insert_test_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password_hash, date_joined)
        VALUES (?, '', '!', strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        RETURNING id
        "#,
    )
    .bind(username)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test user")
}
