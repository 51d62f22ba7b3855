// ABOUTME: Signed bearer tokens for API authentication
// ABOUTME: Issues HS256 access/refresh pairs and verifies them by token type

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::users::User;

pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 5;
pub const DEFAULT_REFRESH_TOKEN_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    Creation(String),
    #[error("Token is invalid or expired: {0}")]
    Invalid(String),
    #[error("Token has wrong type: expected {expected}, got {actual}")]
    WrongType {
        expected: TokenType,
        actual: TokenType,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id, as a decimal string
    pub sub: String,
    pub username: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::Invalid(format!("subject is not a user id: {}", self.sub)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_lifetime: Duration,
    pub refresh_lifetime: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_lifetime: Duration::minutes(DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh_lifetime: Duration::hours(DEFAULT_REFRESH_TOKEN_HOURS),
        }
    }

    /// 32 random bytes, hex encoded. Tokens signed with it do not survive a restart.
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_lifetime: config.access_lifetime,
            refresh_lifetime: config.refresh_lifetime,
        }
    }

    /// Issue a fresh refresh/access pair for a user
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, JwtError> {
        let sub = user.id.to_string();
        Ok(TokenPair {
            refresh: self.create_token(&sub, &user.username, TokenType::Refresh)?,
            access: self.create_token(&sub, &user.username, TokenType::Access)?,
        })
    }

    /// Verify signature and expiry, then require the given token type
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::Invalid(e.to_string()))?
            .claims;

        if claims.token_type != expected {
            return Err(JwtError::WrongType {
                expected,
                actual: claims.token_type,
            });
        }

        Ok(claims)
    }

    /// Mint a new access token from a valid refresh token.
    /// The refresh token itself is not rotated.
    pub fn refresh_access(&self, refresh_token: &str) -> Result<String, JwtError> {
        let claims = self.verify(refresh_token, TokenType::Refresh)?;
        self.create_token(&claims.sub, &claims.username, TokenType::Access)
    }

    fn create_token(
        &self,
        sub: &str,
        username: &str,
        token_type: TokenType,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.access_lifetime,
            TokenType::Refresh => self.refresh_lifetime,
        };

        let claims = Claims {
            sub: sub.to_string(),
            username: username.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Creation(e.to_string()))
    }
}
