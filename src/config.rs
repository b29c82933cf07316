use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::response::ResponseShape;

/// URL selecting [`crate::db::MemoryPlayerStore`] instead of SQLite.
pub const MEMORY_DATABASE_URL: &str = "memory:";

#[derive(Debug, Error)]
#[error("{name} is not in the correct format ({value:?}): {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Process settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
    pub response_shape: ResponseShape,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:players.db".to_string(),
            max_connections: 5,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            request_timeout: Duration::from_secs(10),
            response_shape: ResponseShape::Direct,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from `lookup`, falling back to defaults for unset names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            host: parse_or(&lookup, "HOST", defaults.host)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            request_timeout: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())
                .map(Duration::from_secs)?,
            response_shape: parse_or(&lookup, "RESPONSE_SHAPE", defaults.response_shape)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(err) => Err(ConfigError {
                name,
                reason: err.to_string(),
                value,
            }),
        },
    }
}
