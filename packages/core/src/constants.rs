use std::env;
use std::path::PathBuf;

/// File name of the SQLite database inside the Tasklane directory
pub const DATABASE_FILE_NAME: &str = "tasklane.db";

/// Get the path to the Tasklane directory (~/.tasklane)
pub fn tasklane_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".tasklane")
    } else {
        // Fall back to dirs crate, then the working directory
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tasklane")
    }
}

/// Get the default database path (~/.tasklane/tasklane.db)
pub fn default_database_path() -> PathBuf {
    tasklane_dir().join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_is_inside_tasklane_dir() {
        let path = default_database_path();
        assert_eq!(path.parent(), Some(tasklane_dir().as_path()));
        assert!(path.ends_with(DATABASE_FILE_NAME));
    }
}
