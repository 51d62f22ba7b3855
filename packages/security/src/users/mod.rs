// ABOUTME: User management module
// ABOUTME: Provides types and storage for user accounts

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use types::*;
