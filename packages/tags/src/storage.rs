// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Get-or-create and per-task lookup for tags, usable inside a caller's transaction

use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::debug;

use super::types::Tag;
use tasklane_storage::StorageError;

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a tag by name, creating it when missing.
    /// The flag is true when a new row was inserted.
    pub async fn get_or_create_tag(&self, name: &str) -> Result<(Tag, bool), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        get_or_create_tag(&mut conn, name).await
    }

    pub async fn count_tags(&self) -> Result<i64, StorageError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }
}

/// Get-or-create on an existing connection, so it can run inside a task
/// transaction. Safe against a concurrent insert of the same name.
pub async fn get_or_create_tag(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<(Tag, bool), StorageError> {
    let inserted = sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?
        .rows_affected()
        > 0;

    let row = sqlx::query("SELECT id, name FROM tags WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    if inserted {
        debug!("Created tag: {}", name);
    }

    Ok((row_to_tag(&row)?, inserted))
}

/// Tags attached to a task, ordered by tag id
pub async fn tags_for_task(
    conn: &mut SqliteConnection,
    task_id: i64,
) -> Result<Vec<Tag>, StorageError> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name
        FROM tags t
        JOIN task_tags tt ON tt.tag_id = t.id
        WHERE tt.task_id = ?
        ORDER BY t.id
        "#,
    )
    .bind(task_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(StorageError::Sqlx)?;

    rows.iter().map(row_to_tag).collect()
}

/// Convert a database row to a Tag
fn row_to_tag(row: &SqliteRow) -> Result<Tag, StorageError> {
    Ok(Tag {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
    })
}
