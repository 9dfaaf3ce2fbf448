//! Wire protocol of the sink plugin endpoint
//!
//! This module contains the outer request envelope and its decoder, the
//! closed set of sink operations, and the payload shapes each operation
//! carries. Payloads stay raw JSON until the owning handler decodes them.

pub mod envelope;
pub mod messages;
pub mod operation;

// Re-export for convenience
pub use envelope::{DecodeError, Envelope, decode};
pub use messages::*;
pub use operation::{Operation, UnknownOperation};
