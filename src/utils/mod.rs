//! Utility functions for the sink plugin
//!
//! - Timestamp conversion

pub mod timestamp;

// Re-export for convenience
pub use timestamp::{format_tso, tso_physical_millis};
