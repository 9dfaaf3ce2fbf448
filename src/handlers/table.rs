//! Table onboarding handlers: `sink_add_table` and `sink_remove_table`

use crate::event_sink::{EventSink, SinkEvent};
use crate::handlers::{Handler, HandlerResult, decode_payload};
use crate::protocol::{AddTableRequest, Operation, RemoveTableRequest};
use std::sync::Arc;
use tracing::{debug, info};

pub struct AddTableHandler {
    sink: Arc<dyn EventSink>,
}

impl AddTableHandler {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl Handler for AddTableHandler {
    fn operation(&self) -> Operation {
        Operation::AddTable
    }

    fn handle(&self, payload: &str) -> HandlerResult {
        info!("start execute add table");
        let request: AddTableRequest = decode_payload(self.operation(), payload)?;
        debug!(?request, "decoded add table request");

        self.sink.send_event(SinkEvent::TableAdded {
            table_id: request.table_id,
        })?;

        info!("execute add table end");
        Ok(())
    }
}

pub struct RemoveTableHandler {
    sink: Arc<dyn EventSink>,
}

impl RemoveTableHandler {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl Handler for RemoveTableHandler {
    fn operation(&self) -> Operation {
        Operation::RemoveTable
    }

    fn handle(&self, payload: &str) -> HandlerResult {
        info!("start execute remove table");
        let request: RemoveTableRequest = decode_payload(self.operation(), payload)?;
        debug!(?request, "decoded remove table request");

        self.sink.send_event(SinkEvent::TableRemoved {
            table_id: request.table_id,
        })?;

        info!("execute remove table end");
        Ok(())
    }
}
