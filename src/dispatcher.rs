//! Handler dispatcher
//!
//! Resolves an operation name through the [`OperationRegistry`] and runs the
//! matching handler. Whatever the handler does, including panicking, the
//! dispatcher returns a [`DispatchResult`] so the request can always be
//! answered.

use crate::event_sink::EventSink;
use crate::handlers::HandlerError;
use crate::protocol::Operation;
use crate::registry::{OperationRegistry, RegistryError};
use crate::tracing_context::TracingContext;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Outcome of a single dispatch
#[derive(Debug)]
pub enum DispatchResult {
    /// Handler ran to completion
    Ok(Operation),
    /// Name is not in the registry; no handler ran
    UnsupportedOperation(String),
    /// Handler ran and failed; the failure stays local to this request
    HandlerError {
        operation: Operation,
        cause: HandlerError,
    },
}

impl DispatchResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, DispatchResult::Ok(_))
    }

    /// Operation name as submitted by the caller
    pub fn operation_name(&self) -> &str {
        match self {
            DispatchResult::Ok(operation) => operation.as_str(),
            DispatchResult::UnsupportedOperation(name) => name,
            DispatchResult::HandlerError { operation, .. } => operation.as_str(),
        }
    }
}

/// Stateless router from operation names to handlers
pub struct Dispatcher {
    registry: OperationRegistry,
}

impl Dispatcher {
    pub fn new(registry: OperationRegistry) -> Self {
        Self { registry }
    }

    /// Dispatcher whose handlers all forward to `sink`
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self::new(OperationRegistry::new(sink))
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Dispatch under a freshly generated correlation ID
    pub fn dispatch(&self, operation: &str, payload: &str) -> DispatchResult {
        self.dispatch_in(&TracingContext::new(), operation, payload)
    }

    /// Dispatch inside the span of an existing request context
    pub fn dispatch_in(
        &self,
        context: &TracingContext,
        operation: &str,
        payload: &str,
    ) -> DispatchResult {
        context
            .child_context(operation)
            .with_span(|| self.dispatch_inner(operation, payload))
    }

    fn dispatch_inner(&self, name: &str, payload: &str) -> DispatchResult {
        let handler = match self.registry.lookup(name) {
            Ok(handler) => handler,
            Err(RegistryError::NotFound(name)) => {
                warn!(operation = %name, "unsupport operation");
                return DispatchResult::UnsupportedOperation(name);
            }
        };

        let operation = handler.operation();
        debug!(payload_len = payload.len(), "dispatching to handler");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(payload)))
            .unwrap_or_else(|panic| {
                Err(HandlerError::Panicked {
                    operation,
                    message: panic_message(panic.as_ref()),
                })
            });

        match outcome {
            Ok(()) => DispatchResult::Ok(operation),
            Err(cause) => {
                match &cause {
                    HandlerError::Panicked { .. } => error!("{}", cause),
                    _ => warn!("{}", cause),
                }
                DispatchResult::HandlerError { operation, cause }
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
