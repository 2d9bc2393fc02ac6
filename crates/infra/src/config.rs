//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | Variable                | Default         |
//! |-------------------------|-----------------|
//! | `STOCKROOM_BIND_ADDR`   | `0.0.0.0:8080`  |
//! | `USE_PERSISTENT_STORES` | `false`         |
//! | `DATABASE_URL`          | required if persistent |
//! | `STOCKROOM_LOG_FORMAT`  | `json`          |

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid value: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Log output format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::Invalid {
                var: "STOCKROOM_LOG_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// In-memory store, ephemeral port. For tests.
    pub fn in_memory() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: None,
            log_format: LogFormat::Pretty,
        }
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("STOCKROOM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            var: "STOCKROOM_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                value: raw.clone(),
            })?,
        };

        let database_url = if use_persistent {
            match lookup("DATABASE_URL") {
                Some(url) if !url.trim().is_empty() => Some(url),
                _ => return Err(ConfigError::Missing("DATABASE_URL")),
            }
        } else {
            None
        };

        let log_format = match lookup("STOCKROOM_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            database_url,
            log_format,
        })
    }
}
