// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`ServerConfig`] loaded from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 3000;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("HOST must be an IP address, got {0:?}")]
    InvalidHost(String),

    #[error("LOG_FORMAT must be `json` or `pretty`, got {0:?}")]
    InvalidLogFormat(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host_value = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_value
            .parse()
            .map_err(|_| ConfigError::InvalidHost(host_value.clone()))?;

        let port = match lookup(PORT_ENV) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value.clone()))?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            log_format: LogFormat::default(),
        }
    }
}
