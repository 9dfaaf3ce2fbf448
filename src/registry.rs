//! Operation registry mapping wire names to handlers
//!
//! The registry is filled once at construction with a handler for every
//! [`Operation`] and is read-only afterwards, so it can be shared across
//! concurrent requests without locking.

use crate::event_sink::EventSink;
use crate::handlers::{
    AddTableHandler, EmitDdlEventHandler, EmitRowChangedEventsHandler, Handler,
    RemoveTableHandler,
};
use crate::protocol::Operation;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No handler is registered under this name
    #[error("We haven't support operation {0}")]
    NotFound(String),
}

/// Immutable name to handler table
pub struct OperationRegistry {
    handlers: HashMap<Operation, Box<dyn Handler>>,
}

impl OperationRegistry {
    /// Build the registry with every operation forwarding to `sink`
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        let mut registry = Self {
            handlers: HashMap::with_capacity(Operation::ALL.len()),
        };

        registry.register(Box::new(AddTableHandler::new(sink.clone())));
        registry.register(Box::new(RemoveTableHandler::new(sink.clone())));
        registry.register(Box::new(EmitRowChangedEventsHandler::new(sink.clone())));
        registry.register(Box::new(EmitDdlEventHandler::new(sink)));

        registry
    }

    fn register(&mut self, handler: Box<dyn Handler>) {
        debug!("Registering handler: {}", handler.operation());
        self.handlers.insert(handler.operation(), handler);
    }

    /// Resolve a wire name to its handler
    pub fn lookup(&self, name: &str) -> Result<&dyn Handler, RegistryError> {
        name.parse::<Operation>()
            .ok()
            .and_then(|op| self.handlers.get(&op))
            .map(|handler| handler.as_ref())
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Registered operations, in declaration order
    pub fn operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.handlers.contains_key(op))
            .collect()
    }
}
