//! `sink_emit_row_changed_events` handler

use crate::event_sink::{EventSink, SinkEvent};
use crate::handlers::{Handler, HandlerResult, decode_payload};
use crate::protocol::{Operation, RowChangedEvent};
use std::sync::Arc;
use tracing::info;

/// Forwards a batch of row changes, one record per row and one per column
///
/// Records are forwarded strictly in input order: rows in batch order, and
/// each row's columns in schema order right after its header. Downstream
/// replay depends on this ordering.
pub struct EmitRowChangedEventsHandler {
    sink: Arc<dyn EventSink>,
}

impl EmitRowChangedEventsHandler {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl Handler for EmitRowChangedEventsHandler {
    fn operation(&self) -> Operation {
        Operation::EmitRowChangedEvents
    }

    fn handle(&self, payload: &str) -> HandlerResult {
        info!("start execute row changed events");
        let rows: Vec<RowChangedEvent> = decode_payload(self.operation(), payload)?;

        for (row_index, row) in rows.iter().enumerate() {
            self.sink.send_event(SinkEvent::RowChanged {
                row_index,
                table: row.table_display(),
                kind: row.kind().to_string(),
                commit_ts: row.commit_ts,
            })?;

            for (column_index, column) in row.columns().iter().enumerate() {
                // Skipped columns keep their slot
                let value = column
                    .as_ref()
                    .map(|c| c.value.clone())
                    .unwrap_or(serde_json::Value::Null);

                self.sink.send_event(SinkEvent::ColumnValue {
                    row_index,
                    column_index,
                    value,
                })?;
            }
        }

        info!(rows = rows.len(), "execute row changed events end");
        Ok(())
    }
}
