// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Resolves listen address, database location, token lifetimes, CORS origin and log level

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use chrono::Duration;
use tasklane_config as vars;
use tasklane_security::JwtConfig;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid listen address: {0}")]
    InvalidHost(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub jwt_secret: Option<String>,
    pub access_token_minutes: i64,
    pub refresh_token_hours: i64,
    pub cors_origin: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            database_path: tasklane_core::default_database_path(),
            jwt_secret: None,
            access_token_minutes: tasklane_security::jwt::DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_hours: tasklane_security::jwt::DEFAULT_REFRESH_TOKEN_HOURS,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// First non-empty value among the given variable names
fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

fn parse_positive(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match first_var(&[name]) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<i64>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match first_var(&[vars::TASKLANE_PORT, vars::PORT]) {
            Some(port_str) => port_str.trim().parse::<u16>()?,
            None => defaults.port,
        };

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host = match first_var(&[vars::TASKLANE_HOST]) {
            Some(host) => host
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(host))?,
            None => defaults.host,
        };

        let database_path = first_var(&[vars::TASKLANE_DATABASE_PATH])
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let cors_origin = first_var(&[vars::TASKLANE_CORS_ORIGIN, vars::CORS_ORIGIN])
            .unwrap_or(defaults.cors_origin);

        Ok(Config {
            host,
            port,
            database_path,
            jwt_secret: first_var(&[vars::TASKLANE_JWT_SECRET]),
            access_token_minutes: parse_positive(
                vars::TASKLANE_ACCESS_TOKEN_MINUTES,
                defaults.access_token_minutes,
            )?,
            refresh_token_hours: parse_positive(
                vars::TASKLANE_REFRESH_TOKEN_HOURS,
                defaults.refresh_token_hours,
            )?,
            cors_origin,
            log_level: first_var(&[vars::TASKLANE_LOG]).unwrap_or(defaults.log_level),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Token settings for the server. Without a configured secret a random
    /// one is generated, so issued tokens stop working on restart.
    pub fn jwt_config(&self) -> JwtConfig {
        let secret = match &self.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                warn!(
                    "{} is not set; using a random secret for this process",
                    vars::TASKLANE_JWT_SECRET
                );
                JwtConfig::generate_secret()
            }
        };

        JwtConfig {
            secret,
            access_lifetime: Duration::minutes(self.access_token_minutes),
            refresh_lifetime: Duration::hours(self.refresh_token_hours),
        }
    }
}
