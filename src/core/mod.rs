//! Core module containing fundamental types and configurations
//!
//! This module provides the basic building blocks for the sink plugin,
//! including configuration management and process-level error handling.

pub mod config;
pub mod errors;

// Re-export for convenience
pub use config::{LogFormat, PluginConfig};
pub use errors::{PluginError, PluginResult};
