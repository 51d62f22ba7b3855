// ABOUTME: Task management with status tracking and tag association
// ABOUTME: Provides CRUD operations and storage for tasks

pub mod storage;
pub mod types;

pub use storage::*;
pub use types::*;
