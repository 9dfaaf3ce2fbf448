//! Outer request envelope and its decoder
//!
//! The envelope carries an operation name and an opaque `data` payload. Only
//! the envelope structure is validated here; the payload is kept as raw JSON
//! text and handed to whichever handler claims the operation.

use serde::Deserialize;
use serde_json::value::RawValue;
use thiserror::Error;

/// Payload forwarded when the envelope has no `data` field or it is `null`
const NULL_PAYLOAD: &str = "null";

/// Errors raised while decoding the outer envelope
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Body is not a JSON object carrying a string `operation`
    #[error("{0}")]
    MalformedEnvelope(String),
}

/// Request wrapper: `{ "operation": <string>, "data": <any> }`
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub operation: String,
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

impl Envelope {
    /// Raw JSON text of the payload, untouched
    pub fn payload(&self) -> &str {
        self.data
            .as_deref()
            .map(RawValue::get)
            .unwrap_or(NULL_PAYLOAD)
    }
}

/// Decode a request body into an [`Envelope`]
pub fn decode(raw_body: &[u8]) -> Result<Envelope, DecodeError> {
    serde_json::from_slice(raw_body).map_err(|e| DecodeError::MalformedEnvelope(e.to_string()))
}
