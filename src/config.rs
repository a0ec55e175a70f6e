use crate::session;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_POOL_SIZE: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_IN_SECONDS: u64 = 10;
const DEFAULT_SYNC_WORKERS: usize = 1;
const DEFAULT_SYNC_LEASE_IN_SECONDS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} environment variable is not set")]
    MissingVar { name: &'static str },
    #[error("{name} environment variable has an invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },
    #[error("invalid interval {value:?}: {msg}")]
    InvalidInterval { value: String, msg: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub database_pool_size: u32,
    pub request_timeout: Duration,
    pub sync_workers: usize,
    pub sync_lease: Duration,
    /// `GATOR_USER`, overrides the user saved by `login`.
    pub current_user_name: Option<String>,
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingVar {
                name: "DATABASE_URL",
            })?;

        let database_pool_size =
            parse_var(&lookup, "DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?;
        let timeout_secs = parse_var(
            &lookup,
            "REQUEST_TIMEOUT_IN_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_IN_SECONDS,
        )?;
        let sync_workers = parse_var(&lookup, "SYNC_WORKERS", DEFAULT_SYNC_WORKERS)?;
        let lease_secs = parse_var(&lookup, "SYNC_LEASE_SECONDS", DEFAULT_SYNC_LEASE_IN_SECONDS)?;

        if database_pool_size == 0 {
            return Err(ConfigError::InvalidVar {
                name: "DATABASE_POOL_SIZE",
                value: "0".to_string(),
            });
        }

        if sync_workers == 0 {
            return Err(ConfigError::InvalidVar {
                name: "SYNC_WORKERS",
                value: "0".to_string(),
            });
        }

        if lease_secs == 0 {
            return Err(ConfigError::InvalidVar {
                name: "SYNC_LEASE_SECONDS",
                value: "0".to_string(),
            });
        }

        let current_user_name = lookup("GATOR_USER")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let session_file = match lookup("GATOR_CONFIG_FILE").filter(|path| !path.trim().is_empty()) {
            Some(path) => PathBuf::from(path.trim()),
            None => lookup("HOME")
                .filter(|home| !home.trim().is_empty())
                .map(|home| PathBuf::from(home).join(session::FILE_NAME))
                .ok_or(ConfigError::MissingVar { name: "HOME" })?,
        };

        Ok(Config {
            database_url,
            database_pool_size,
            request_timeout: Duration::from_secs(timeout_secs),
            sync_workers,
            sync_lease: Duration::from_secs(lease_secs),
            current_user_name,
            session_file,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
    }
}

/// Parses a poll interval such as `30s`, `1m` or `1h30m`.
///
/// Zero-length intervals are rejected since the scheduler would spin.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let trimmed = value.trim();

    let interval =
        humantime::parse_duration(trimmed).map_err(|err| ConfigError::InvalidInterval {
            value: value.to_string(),
            msg: err.to_string(),
        })?;

    if interval.is_zero() {
        return Err(ConfigError::InvalidInterval {
            value: value.to_string(),
            msg: "interval must be greater than zero".to_string(),
        });
    }

    Ok(interval)
}
