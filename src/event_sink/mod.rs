//! Event sink foundation for the plugin handlers
//!
//! Handlers decode their payload and forward what they observed to an
//! [`EventSink`]. The default sink writes structured tracing events; a real
//! downstream writer plugs in behind the same trait.

use serde::Serialize;
use thiserror::Error;

pub mod memory;
pub mod tracing_sink;

/// Something a handler observed and forwards downstream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    TableAdded {
        table_id: i64,
    },
    TableRemoved {
        table_id: i64,
    },
    /// Header for one row of an emit batch, followed by its column values
    RowChanged {
        row_index: usize,
        table: String,
        kind: String,
        commit_ts: u64,
    },
    ColumnValue {
        row_index: usize,
        column_index: usize,
        value: serde_json::Value,
    },
    DdlApplied {
        query: String,
        action: u8,
        action_name: String,
        commit_ts: u64,
        table: Option<String>,
    },
}

/// Errors raised by a sink while accepting an event
#[derive(Error, Debug)]
#[error("{sink} sink rejected event: {message}")]
pub struct SinkError {
    pub sink: &'static str,
    pub message: String,
}

impl SinkError {
    pub fn new<S: Into<String>>(sink: &'static str, message: S) -> Self {
        Self {
            sink,
            message: message.into(),
        }
    }
}

/// EventSink trait for forwarding handler observations
///
/// Sinks are shared by every in-flight request, so implementations provide
/// their own synchronization. `send_event` must not block on slow I/O.
pub trait EventSink: Send + Sync {
    /// Get the sink type identifier
    fn sink_type(&self) -> &'static str;

    /// Accept a single event
    fn send_event(&self, event: SinkEvent) -> Result<(), SinkError>;
}

pub use memory::*;
pub use tracing_sink::*;
