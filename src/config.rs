// src/config.rs
use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Process-wide settings, read once at startup and handed to everything else.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// PostgreSQL address. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub signing_key: String,
    pub token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_key = env::var("JWT_SECRET")
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "5000")?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
            signing_key,
            token_ttl: Duration::from_secs(try_load("TOKEN_TTL_SECS", "3600")?),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults_for_unset_keys() {
        let port: u16 = try_load("POLL_SERVICE_TEST_UNSET_PORT", "5000").unwrap();
        assert_eq!(port, 5000);
    }

    #[test]
    fn rejects_unparsable_values() {
        let err = try_load::<u16>("POLL_SERVICE_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "POLL_SERVICE_TEST_UNSET_PORT",
                ..
            }
        ));
    }

    #[test]
    fn formats_bind_address() {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 8080,
            database_url: None,
            max_connections: 5,
            signing_key: "k".into(),
            token_ttl: Duration::from_secs(60),
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
