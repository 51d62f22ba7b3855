// ABOUTME: Task storage layer using SQLite
// ABOUTME: Handles CRUD operations for tasks and their tag associations

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::debug;

use super::types::{Task, TaskCreateInput, TaskFilter, TaskReplaceInput};
use tasklane_storage::StorageError;
use tasklane_tags::storage::{get_or_create_tag, tags_for_task};
use tasklane_tags::Tag;

const TASK_COLUMNS: &str = "id, title, description, timestamp, due_date, status, created_by";

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List tasks ordered by id, optionally narrowed to a single status
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StorageError> {
        debug!("Fetching tasks (status: {:?})", filter.status);

        let status = filter.status.map(|s| s.as_str());

        let rows = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE (? IS NULL OR status = ?) ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(status)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        // Load every tag association for the selected tasks in one query
        let tag_rows = sqlx::query(
            r#"
            SELECT tt.task_id, t.id, t.name
            FROM task_tags tt
            JOIN tags t ON t.id = tt.tag_id
            JOIN tasks k ON k.id = tt.task_id
            WHERE (? IS NULL OR k.status = ?)
            ORDER BY tt.task_id, t.id
            "#,
        )
        .bind(status)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut tags_by_task: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in &tag_rows {
            let task_id: i64 = row.try_get("task_id").map_err(StorageError::Sqlx)?;
            tags_by_task.entry(task_id).or_default().push(Tag {
                id: row.try_get("id").map_err(StorageError::Sqlx)?,
                name: row.try_get("name").map_err(StorageError::Sqlx)?,
            });
        }

        rows.iter()
            .map(|row| {
                let mut task = row_to_task(row)?;
                task.tags = tags_by_task.remove(&task.id).unwrap_or_default();
                Ok(task)
            })
            .collect()
    }

    pub async fn get_task(&self, task_id: i64) -> Result<Task, StorageError> {
        debug!("Fetching task: {}", task_id);

        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        fetch_task(&mut conn, task_id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Create a task owned by `user_id`, resolving tag names with
    /// get-or-create. All writes happen in one transaction.
    pub async fn create_task(
        &self,
        user_id: i64,
        input: TaskCreateInput,
    ) -> Result<Task, StorageError> {
        let now = Utc::now();

        debug!("Creating task '{}' for user: {}", input.title, user_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let task_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tasks (title, description, timestamp, due_date, status, created_by)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(now)
        .bind(input.due_date)
        .bind(input.status)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        attach_tags(&mut tx, task_id, &input.tags).await?;

        let task = fetch_task(&mut tx, task_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(task)
    }

    /// Replace the mutable fields of a task. Owner and timestamp never change.
    pub async fn replace_task(
        &self,
        task_id: i64,
        input: TaskReplaceInput,
    ) -> Result<Task, StorageError> {
        debug!("Replacing task: {}", task_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        // Build UPDATE query based on which optional fields were supplied
        let mut query = String::from("UPDATE tasks SET title = ?, description = ?");
        if input.status.is_some() {
            query.push_str(", status = ?");
        }
        if input.due_date.is_some() {
            query.push_str(", due_date = ?");
        }
        query.push_str(" WHERE id = ?");

        let mut q = sqlx::query(&query)
            .bind(&input.title)
            .bind(&input.description);

        if let Some(status) = input.status {
            q = q.bind(status);
        }
        if let Some(due_date) = input.due_date {
            q = q.bind(due_date);
        }

        let updated = q
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?
            .rows_affected();

        if updated == 0 {
            return Err(StorageError::NotFound);
        }

        if let Some(tags) = &input.tags {
            sqlx::query("DELETE FROM task_tags WHERE task_id = ?")
                .bind(task_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;

            attach_tags(&mut tx, task_id, tags).await?;
        }

        let task = fetch_task(&mut tx, task_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(task)
    }

    /// Delete a task. Its tag associations go with it; the tags remain.
    pub async fn delete_task(&self, task_id: i64) -> Result<(), StorageError> {
        debug!("Deleting task: {}", task_id);

        let deleted = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .rows_affected();

        if deleted == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn count_tasks(&self) -> Result<i64, StorageError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }
}

/// Associate each named tag with the task, creating missing tags.
/// Repeated names attach once.
async fn attach_tags(
    conn: &mut SqliteConnection,
    task_id: i64,
    names: &[String],
) -> Result<(), StorageError> {
    for name in names {
        let (tag, _) = get_or_create_tag(conn, name).await?;

        sqlx::query("INSERT INTO task_tags (task_id, tag_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
            .bind(task_id)
            .bind(tag.id)
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;
    }

    Ok(())
}

async fn fetch_task(
    conn: &mut SqliteConnection,
    task_id: i64,
) -> Result<Option<Task>, StorageError> {
    let row = sqlx::query(&format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS))
        .bind(task_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut task = row_to_task(&row)?;
    task.tags = tags_for_task(conn, task_id).await?;
    Ok(Some(task))
}

/// Convert a database row to a Task without its tags
fn row_to_task(row: &SqliteRow) -> Result<Task, StorageError> {
    Ok(Task {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        timestamp: row.try_get("timestamp").map_err(StorageError::Sqlx)?,
        due_date: row.try_get("due_date").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        created_by: row.try_get("created_by").map_err(StorageError::Sqlx)?,
        tags: Vec::new(),
    })
}
