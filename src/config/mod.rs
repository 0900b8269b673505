//! Application configuration loaded from environment.

use std::net::{Ipv4Addr, SocketAddr};

use chrono::Duration;

const DEFAULT_PORT: u16 = 8080;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address; always `0.0.0.0:<PORT>`.
    pub server_addr: SocketAddr,
    /// JWT signing secret. Required.
    pub jwt_secret: String,
    /// Token lifetime. `None` means issued tokens carry no `exp` claim.
    pub jwt_ttl: Option<Duration>,
    /// PostgreSQL connection URL. `None` selects the in-memory user service.
    pub database_url: Option<String>,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigLoadError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let server_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigLoadError::MissingJwtSecret)?;

        let jwt_ttl = match lookup("JWT_EXPIRES_IN").filter(|v| !v.trim().is_empty()) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => Some(Duration::seconds(secs)),
                _ => return Err(ConfigLoadError::InvalidExpiry(raw)),
            },
            None => None,
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            server_addr,
            jwt_secret,
            jwt_ttl,
            database_url,
            log_level,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),
    #[error("Invalid JWT_EXPIRES_IN (expected positive seconds): {0}")]
    InvalidExpiry(String),
}
