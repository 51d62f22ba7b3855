// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles account creation, lookup, credential checks and deletion

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, warn};

use super::types::{User, UserCreateInput};
use crate::password::{hash_password, verify_password};
use tasklane_storage::StorageError;

const USER_COLUMNS: &str = "id, username, email, password_hash, is_active, date_joined";

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account, hashing the supplied password.
    /// A taken username yields `StorageError::Duplicate("username")`.
    pub async fn create_user(&self, input: UserCreateInput) -> Result<User, StorageError> {
        debug!("Creating user: {}", input.username);

        // Argon2 is CPU-bound; keep it off the async workers
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| StorageError::Credential(e.to_string()))?
            .map_err(|e| StorageError::Credential(e.to_string()))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, is_active, date_joined)
            VALUES (?, ?, ?, 1, ?)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::from_unique(e, "username"))?;

        row_to_user(&row)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        row_to_user(&row)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        debug!("Fetching user by username: {}", username);

        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_user).transpose()
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(count > 0)
    }

    /// Return the user when the username exists, the account is active and
    /// the password matches.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        let Some(user) = self.get_user_by_username(username).await? else {
            return Ok(None);
        };

        if !user.is_active {
            debug!("Rejecting login for inactive user: {}", username);
            return Ok(None);
        }

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| StorageError::Credential(e.to_string()))?;

        match verified {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Unusable password hash for user {}: {}", username, e);
                Ok(None)
            }
        }
    }

    pub async fn set_active(&self, user_id: i64, is_active: bool) -> Result<User, StorageError> {
        debug!("Setting user {} active: {}", user_id, is_active);

        let updated = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .rows_affected();

        if updated == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_user(user_id).await
    }

    /// Delete an account; the user's tasks are removed by cascade
    pub async fn delete_user(&self, user_id: i64) -> Result<(), StorageError> {
        debug!("Deleting user: {}", user_id);

        let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .rows_affected();

        if deleted == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

/// Convert a database row to a User
fn row_to_user(row: &SqliteRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        username: row.try_get("username").map_err(StorageError::Sqlx)?,
        email: row.try_get("email").map_err(StorageError::Sqlx)?,
        password_hash: row.try_get("password_hash").map_err(StorageError::Sqlx)?,
        is_active: row.try_get("is_active").map_err(StorageError::Sqlx)?,
        date_joined: row.try_get("date_joined").map_err(StorageError::Sqlx)?,
    })
}
