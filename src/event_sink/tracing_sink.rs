//! Tracing event sink, the default destination for handler observations

use crate::event_sink::{EventSink, SinkError, SinkEvent};
use crate::utils::format_tso;
use tracing::info;

/// Writes every sink event as a structured `info` log line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn sink_type(&self) -> &'static str {
        "tracing"
    }

    fn send_event(&self, event: SinkEvent) -> Result<(), SinkError> {
        match event {
            SinkEvent::TableAdded { table_id } => {
                info!(table_id, "req data: add table {}", table_id);
            }
            SinkEvent::TableRemoved { table_id } => {
                info!(table_id, "req data: remove table {}", table_id);
            }
            SinkEvent::RowChanged {
                row_index,
                table,
                kind,
                commit_ts,
            } => {
                info!(
                    row_index,
                    commit_ts,
                    "index: {}, table: {}, kind: {}, commit time: {}",
                    row_index,
                    table,
                    kind,
                    format_tso(commit_ts)
                );
            }
            SinkEvent::ColumnValue {
                row_index,
                column_index,
                value,
            } => {
                info!(
                    row_index,
                    column_index,
                    "column index: {}, column value: {}",
                    column_index,
                    value
                );
            }
            SinkEvent::DdlApplied {
                query,
                action,
                action_name,
                commit_ts,
                table,
            } => {
                info!(
                    action,
                    commit_ts,
                    "req data: {} (type {}) on {} ({}), commit time: {}",
                    action_name,
                    action,
                    table.as_deref().unwrap_or("-"),
                    query,
                    format_tso(commit_ts)
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tracing_sink_basic() {
        let sink = TracingSink::new();
        assert_eq!(sink.sink_type(), "tracing");
    }

    #[test]
    fn test_tracing_sink_accepts_every_event() {
        let sink = TracingSink::new();
        let events = vec![
            SinkEvent::TableAdded { table_id: 1 },
            SinkEvent::TableRemoved { table_id: 1 },
            SinkEvent::RowChanged {
                row_index: 0,
                table: "`test`.`t`".to_string(),
                kind: "insert".to_string(),
                commit_ts: 0,
            },
            SinkEvent::ColumnValue {
                row_index: 0,
                column_index: 0,
                value: json!(null),
            },
            SinkEvent::DdlApplied {
                query: "DROP TABLE t".to_string(),
                action: 4,
                action_name: "drop table".to_string(),
                commit_ts: 0,
                table: None,
            },
        ];

        for event in events {
            assert!(sink.send_event(event).is_ok());
        }
    }
}
