//! Process-level error types for the sink plugin
//! Provides structured error handling using thiserror for startup and serving failures

use thiserror::Error;

/// Main error type for the sink plugin process
#[derive(Error, Debug)]
pub enum PluginError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP server errors (bind, accept, serve)
    #[error("Server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network/IO related errors, e.g. binding the listen address
    #[error("Network IO error: {0}")]
    NetworkIO(#[from] std::io::Error),

}

/// Result type alias for convenience
pub type PluginResult<T> = std::result::Result<T, PluginError>;

impl PluginError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a server error that keeps the underlying cause
    pub fn server_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Server {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
