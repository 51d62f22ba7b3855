// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Tasklane

// Server Configuration
pub const TASKLANE_PORT: &str = "TASKLANE_PORT";
pub const PORT: &str = "PORT"; // Legacy
pub const TASKLANE_HOST: &str = "TASKLANE_HOST";

// Storage Configuration
pub const TASKLANE_DATABASE_PATH: &str = "TASKLANE_DATABASE_PATH";

// Token Configuration
pub const TASKLANE_JWT_SECRET: &str = "TASKLANE_JWT_SECRET";
pub const TASKLANE_ACCESS_TOKEN_MINUTES: &str = "TASKLANE_ACCESS_TOKEN_MINUTES";
pub const TASKLANE_REFRESH_TOKEN_HOURS: &str = "TASKLANE_REFRESH_TOKEN_HOURS";

// CORS Configuration
pub const TASKLANE_CORS_ORIGIN: &str = "TASKLANE_CORS_ORIGIN";
pub const CORS_ORIGIN: &str = "CORS_ORIGIN"; // Legacy

// Logging
pub const TASKLANE_LOG: &str = "TASKLANE_LOG";
