// ABOUTME: User type definitions
// ABOUTME: Structures for user accounts and account creation

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum username length, in characters
pub const MAX_USERNAME_LENGTH: usize = 150;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

/// Validated fields for a new account; `password` is plaintext and is hashed
/// before it reaches the database.
#[derive(Debug, Clone)]
pub struct UserCreateInput {
    pub username: String,
    pub email: String,
    pub password: String,
}
