// ABOUTME: Task type definitions
// ABOUTME: Structures for tasks, their lifecycle status, and storage inputs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tasklane_tags::Tag;

/// Maximum title length, in characters
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum description length, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Open,
    Working,
    PendingReview,
    Completed,
    Overdue,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Open,
        TaskStatus::Working,
        TaskStatus::PendingReview,
        TaskStatus::Completed,
        TaskStatus::Overdue,
        TaskStatus::Cancelled,
    ];

    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::Working => "WORKING",
            TaskStatus::PendingReview => "PENDING_REVIEW",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Overdue => "OVERDUE",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a valid task status")]
pub struct ParseTaskStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    /// Exact, case-sensitive match on the wire representation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseTaskStatusError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_by: i64,
    pub tags: Vec<Tag>,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Validated fields for a new task. The owner is passed separately.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCreateInput {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

/// Validated fields for a full replace.
///
/// `None` on `status`, `due_date` or `tags` keeps the stored value;
/// `due_date: Some(None)` clears the date and `tags: Some(vec![])` detaches
/// every tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReplaceInput {
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
}
