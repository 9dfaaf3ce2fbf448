//! In-memory event sink, used by tests and by embedders that inspect what
//! the handlers observed

use crate::event_sink::{EventSink, SinkError, SinkEvent};
use std::sync::Mutex;

/// Collects events in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SinkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far
    pub fn events(&self) -> Vec<SinkEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn sink_type(&self) -> &'static str {
        "memory"
    }

    fn send_event(&self, event: SinkEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .map_err(|_| SinkError::new(self.sink_type(), "event buffer poisoned"))?
            .push(event);
        Ok(())
    }
}
