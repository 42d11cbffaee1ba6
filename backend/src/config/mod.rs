//! Central module for application-wide configuration settings.
//!
//! This module handles loading and validating configuration parameters such as
//! the MongoDB connection string, the session signing secret and lifetime, the
//! password hashing cost, and the server's bind address. Every recognized
//! option is a field of [`Config`]; nothing is read from the environment after
//! startup.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;
pub const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;
pub const DEFAULT_COOKIE_NAME: &str = "farmhub.session-token";
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub mongodb_uri: String,
    /// Overrides the database named in the URI.
    pub mongodb_db: Option<String>,
    pub session_secret: String,
    pub session_ttl: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
    pub store_timeout: Duration,
    pub host: String,
    pub port: u16,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("mongodb_uri", &"<redacted>")
            .field("mongodb_db", &self.mongodb_db)
            .field("session_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("store_timeout", &self.store_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Loads from the process environment, after `.env.local` and `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads using `lookup` to resolve variable names. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongodb_uri = var("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?;

        let session_secret = var("SESSION_SECRET")
            .or_else(|| var("NEXTAUTH_SECRET"))
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        if session_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                var: "SESSION_SECRET",
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }

        let ttl_secs: u64 = parse_or(&var, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if ttl_secs == 0 || ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid {
                var: "SESSION_TTL_SECS",
                reason: format!("must be between 1 and {MAX_SESSION_TTL_SECS}"),
            });
        }

        let bcrypt_cost: u32 = parse_or(&var, "BCRYPT_COST", 10)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                var: "BCRYPT_COST",
                reason: "must be between 4 and 31".into(),
            });
        }

        let timeout_ms: u64 = parse_or(&var, "STORE_TIMEOUT_MS", 5000)?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "STORE_TIMEOUT_MS",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            mongodb_uri,
            mongodb_db: var("MONGODB_DB"),
            session_secret,
            session_ttl: Duration::from_secs(ttl_secs),
            cookie_name: var("SESSION_COOKIE_NAME").unwrap_or_else(|| DEFAULT_COOKIE_NAME.into()),
            cookie_secure: parse_or(&var, "COOKIE_SECURE", true)?,
            bcrypt_cost,
            store_timeout: Duration::from_millis(timeout_ms),
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port: parse_or(&var, "PORT", 3000)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
