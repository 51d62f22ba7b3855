// ABOUTME: Tag type definitions
// ABOUTME: A tag is a uniquely named label shared by any number of tasks

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum tag name length, in characters
pub const MAX_TAG_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
