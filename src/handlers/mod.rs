//! Per-operation handlers
//!
//! Each handler owns the second decode phase: it turns the raw `data` text
//! of the envelope into its typed request and forwards what it observed to
//! the shared [`EventSink`](crate::event_sink::EventSink). Handlers are
//! synchronous and keep no state between calls.

use crate::event_sink::SinkError;
use crate::protocol::Operation;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod ddl;
pub mod row_changed;
pub mod table;

pub use ddl::EmitDdlEventHandler;
pub use row_changed::EmitRowChangedEventsHandler;
pub use table::{AddTableHandler, RemoveTableHandler};

/// Errors raised while a handler processes its payload
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Payload does not match the shape the operation expects
    #[error("{operation} unmarshal failed, error: {source}")]
    PayloadDecodeFailed {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// The sink refused a decoded event
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The handler panicked; captured by the dispatcher
    #[error("{operation} handler panicked: {message}")]
    Panicked {
        operation: Operation,
        message: String,
    },
}

/// Result type alias for handler invocations
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// A handler for exactly one sink operation
pub trait Handler: Send + Sync {
    /// The operation this handler is registered under
    fn operation(&self) -> Operation;

    /// Decode and process the raw JSON payload
    fn handle(&self, payload: &str) -> HandlerResult;
}

/// Decode a raw payload into the handler's typed request
pub(crate) fn decode_payload<T: DeserializeOwned>(
    operation: Operation,
    payload: &str,
) -> Result<T, HandlerError> {
    serde_json::from_str(payload)
        .map_err(|source| HandlerError::PayloadDecodeFailed { operation, source })
}
