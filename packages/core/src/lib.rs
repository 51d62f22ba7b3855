// ABOUTME: Core types and utilities for Tasklane
// ABOUTME: Foundational package providing shared functionality across all Tasklane packages

pub mod constants;
pub mod validation;

// Re-export constants
pub use constants::{default_database_path, tasklane_dir, DATABASE_FILE_NAME};

// Re-export validation
pub use validation::{
    reject_null, validate_char_field, validate_max_chars, FieldErrors, BLANK_MESSAGE,
    NULL_MESSAGE, REQUIRED_MESSAGE,
};
