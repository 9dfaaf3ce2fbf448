//! Configuration management for the sink plugin
//!
//! This module handles loading configuration from environment variables.
//! Command line flags parsed in `main` are applied on top through
//! [`PluginConfig::with_overrides`].

use super::{PluginError, PluginResult};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5005;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Output format of the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(PluginError::config(
                "LOG_FORMAT must be one of: 'pretty' or 'json'",
            )),
        }
    }
}

/// Runtime configuration of the plugin HTTP endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_format: LogFormat::default(),
        }
    }
}

impl PluginConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// Optional (with defaults):
    /// - `SINK_PLUGIN_HOST`: Address to listen on (default: "0.0.0.0")
    /// - `SINK_PLUGIN_PORT`: Port to listen on (default: 5005)
    /// - `SINK_PLUGIN_REQUEST_TIMEOUT_SECS`: Per-request deadline (default: 30)
    /// - `LOG_FORMAT`: "pretty" or "json" (default: "pretty")
    pub fn from_env() -> PluginResult<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> PluginResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SINK_PLUGIN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("SINK_PLUGIN_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                PluginError::config(format!(
                    "SINK_PLUGIN_PORT must be a port number, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_PORT,
        };

        let request_timeout_secs = match lookup("SINK_PLUGIN_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                PluginError::config(format!(
                    "SINK_PLUGIN_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Self::validate_and_create(host, port, request_timeout_secs, log_format)
    }

    /// Validate configuration parameters and create PluginConfig
    fn validate_and_create(
        host: String,
        port: u16,
        request_timeout_secs: u64,
        log_format: LogFormat,
    ) -> PluginResult<Self> {
        if host.trim().is_empty() {
            return Err(PluginError::config("SINK_PLUGIN_HOST cannot be empty"));
        }

        if request_timeout_secs == 0 {
            return Err(PluginError::config(
                "SINK_PLUGIN_REQUEST_TIMEOUT_SECS must be greater than zero",
            ));
        }

        let config = Self {
            host,
            port,
            request_timeout_secs,
            log_format,
        };

        // Fail at startup rather than at bind time
        config.listen_addr()?;

        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(
        self,
        host: Option<String>,
        port: Option<u16>,
        log_format: Option<LogFormat>,
    ) -> PluginResult<Self> {
        Self::validate_and_create(
            host.unwrap_or(self.host),
            port.unwrap_or(self.port),
            self.request_timeout_secs,
            log_format.unwrap_or(self.log_format),
        )
    }

    /// Socket address the HTTP endpoint binds to
    pub fn listen_addr(&self) -> PluginResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                PluginError::config(format!(
                    "SINK_PLUGIN_HOST '{}' is not a valid IP address",
                    self.host
                ))
            })
    }

    /// Deadline applied to every HTTP request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
