//! CDC Sink Plugin
//!
//! An HTTP endpoint receiving sink operations from a TiCDC-style changefeed
//! owner (add table, remove table, emit row changed events, emit DDL event),
//! routing each to its handler and forwarding what it observed to an event
//! sink. The default sink writes structured log lines.
//!
//! Request flow: [`protocol::decode`] → [`dispatcher::Dispatcher`] →
//! [`registry::OperationRegistry`] → [`handlers::Handler`] →
//! [`event_sink::EventSink`], with [`server`] mapping the outcome onto HTTP.

pub mod core;
pub mod dispatcher;
pub mod event_sink;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tracing_context;
pub mod utils;

pub use dispatcher::{DispatchResult, Dispatcher};
pub use event_sink::{EventSink, MemorySink, SinkEvent, TracingSink};
pub use protocol::Operation;
pub use registry::OperationRegistry;
