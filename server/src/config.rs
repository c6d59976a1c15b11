//! Server configuration from environment variables.

use std::env;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default lifetime of a login session in days.
pub const DEFAULT_SESSION_DAYS: i64 = 30;

/// Longest accepted session lifetime. Keeps expiry arithmetic in range.
pub const MAX_SESSION_DAYS: i64 = 3650;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_days: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`: Postgres connection string
    ///
    /// Optional:
    /// - `HEARTH_BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - `HEARTH_SESSION_DAYS`: login session lifetime, 1 to 3650 (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let bind_addr =
            env::var("HEARTH_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let session_days = match env::var("HEARTH_SESSION_DAYS") {
            Ok(value) => parse_session_days(&value)?,
            Err(_) => DEFAULT_SESSION_DAYS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            session_days,
        })
    }
}

fn parse_session_days(value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|days| (1..=MAX_SESSION_DAYS).contains(days))
        .ok_or_else(|| ConfigError::InvalidValue {
            name: "HEARTH_SESSION_DAYS".to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_days() {
        assert_eq!(parse_session_days("7").unwrap(), 7);
        assert_eq!(parse_session_days(" 14 ").unwrap(), 14);
        assert_eq!(parse_session_days("3650").unwrap(), MAX_SESSION_DAYS);
        assert!(parse_session_days("0").is_err());
        assert!(parse_session_days("3651").is_err());
        assert!(parse_session_days("100000000").is_err());
        assert!(parse_session_days("soon").is_err());
    }
}
