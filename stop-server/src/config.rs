//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::arrivals::DEFAULT_ARRIVAL_LIMIT;

/// Error returned when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: &'static str,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Directory holding the GTFS text files.
    pub gtfs_dir: PathBuf,

    /// Number of upcoming arrivals returned per query.
    pub arrival_limit: usize,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// Recognises `STOP_SERVER_HOST`, `PORT`, `GTFS_DIR` and `ARRIVAL_LIMIT`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("STOP_SERVER_HOST") {
            config.host = value.parse().map_err(|_| ConfigError {
                key: "STOP_SERVER_HOST",
                value,
                reason: "expected an IP address",
            })?;
        }

        if let Some(value) = lookup("PORT") {
            config.port = value.parse().map_err(|_| ConfigError {
                key: "PORT",
                value,
                reason: "expected a port number",
            })?;
        }

        if let Some(value) = lookup("GTFS_DIR") {
            config.gtfs_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("ARRIVAL_LIMIT") {
            config.arrival_limit = match value.parse() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError {
                        key: "ARRIVAL_LIMIT",
                        value,
                        reason: "expected a positive integer",
                    });
                }
            };
        }

        Ok(config)
    }

    /// Set a custom dataset directory.
    pub fn with_gtfs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.gtfs_dir = dir.into();
        self
    }

    /// The socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            gtfs_dir: PathBuf::from("data/gtfs"),
            arrival_limit: DEFAULT_ARRIVAL_LIMIT,
        }
    }
}
