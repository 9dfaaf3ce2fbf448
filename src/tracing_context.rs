//! Correlation ID and tracing context management
//!
//! Every request handled by the plugin runs inside a span carrying a
//! correlation ID, either supplied by the caller in the `x-correlation-id`
//! header or generated here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::Span;
use uuid::Uuid;

/// Global counter for generating sequential correlation IDs
static CORRELATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A correlation ID that uniquely identifies a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new correlation ID using timestamp and counter
    pub fn new() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let counter = CORRELATION_COUNTER.fetch_add(1, Ordering::SeqCst);

        // Format: timestamp-counter for readability and uniqueness
        let id = format!("{}-{}", timestamp, counter);
        CorrelationId(id)
    }

    /// Generate a UUID-based correlation ID
    pub fn new_uuid() -> Self {
        CorrelationId(Uuid::new_v4().to_string())
    }

    /// Create a correlation ID from a string (useful for received IDs)
    pub fn from_string(id: String) -> Self {
        CorrelationId(id)
    }

    /// Get the correlation ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracing context that holds correlation and span information
#[derive(Debug, Clone)]
pub struct TracingContext {
    pub correlation_id: CorrelationId,
    pub span: Span,
}

impl TracingContext {
    /// Create a new tracing context with a generated correlation ID
    pub fn new() -> Self {
        Self::with_correlation_id(CorrelationId::new())
    }

    /// Create a tracing context with a specific correlation ID
    pub fn with_correlation_id(correlation_id: CorrelationId) -> Self {
        let span = tracing::info_span!(
            "sink_request",
            correlation_id = %correlation_id,
            component = "cdc-sink-plugin"
        );

        Self {
            correlation_id,
            span,
        }
    }

    /// Create a child context for a specific operation
    pub fn child_context(&self, operation: &str) -> Self {
        let span = tracing::info_span!(
            parent: &self.span,
            "sink_operation",
            correlation_id = %self.correlation_id,
            operation = operation
        );

        Self {
            correlation_id: self.correlation_id.clone(),
            span,
        }
    }

    /// Enter the span and execute a function
    pub fn with_span<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.span.enter();
        f()
    }
}

impl Default for TracingContext {
    fn default() -> Self {
        Self::new()
    }
}
