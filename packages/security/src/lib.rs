// ABOUTME: Security and authentication functionality for Tasklane
// ABOUTME: Provides user accounts, password hashing and JWT access/refresh tokens

pub mod jwt;
pub mod password;
pub mod users;

// Re-export main types for convenience
pub use jwt::{Claims, JwtConfig, JwtError, JwtService, TokenPair, TokenType};
pub use password::{hash_password, verify_password, PasswordError};
pub use users::storage::UserStorage;
pub use users::{User, UserCreateInput};
