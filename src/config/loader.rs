//! Load configuration from environment variables (after `.env`, if present).

use super::types::{AppConfig, DatabaseConfig, RateLimitConfig};
use crate::error::ConfigError;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

impl AppConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `get`, falling back to defaults for unset or blank keys.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = AppConfig::default();
        let db_defaults = DatabaseConfig::default();
        let rl_defaults = RateLimitConfig::default();

        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or(db_defaults.host),
            port: parse(&get, "DB_PORT", db_defaults.port)?,
            name: get("DB_NAME").unwrap_or(db_defaults.name),
            user: get("DB_USER").unwrap_or(db_defaults.user),
            password: get("DB_PASSWORD").unwrap_or(db_defaults.password),
            max_connections: parse(&get, "DB_MAX_CONNECTIONS", db_defaults.max_connections)?,
            acquire_timeout: Duration::from_secs(parse(
                &get,
                "DB_ACQUIRE_TIMEOUT_SECS",
                db_defaults.acquire_timeout.as_secs(),
            )?),
        };
        if database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let rate_limit = RateLimitConfig {
            window: Duration::from_millis(parse(
                &get,
                "RATE_LIMIT_WINDOW_MS",
                rl_defaults.window.as_millis() as u64,
            )?),
            max_requests: parse(&get, "RATE_LIMIT_MAX_REQUESTS", rl_defaults.max_requests)?,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(AppConfig {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse(&get, "PORT", defaults.port)?,
            environment: parse(&get, "APP_ENV", defaults.environment)?,
            storage: parse(&get, "STORAGE_BACKEND", defaults.storage)?,
            database,
            allowed_origins,
            rate_limit,
        })
    }
}

fn parse<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
