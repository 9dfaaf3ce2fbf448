//! `sink_emit_ddl_event` handler

use crate::event_sink::{EventSink, SinkEvent};
use crate::handlers::{Handler, HandlerResult, decode_payload};
use crate::protocol::{DdlEvent, Operation};
use std::sync::Arc;
use tracing::info;

/// Forwards a single schema change as one summary record
pub struct EmitDdlEventHandler {
    sink: Arc<dyn EventSink>,
}

impl EmitDdlEventHandler {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl Handler for EmitDdlEventHandler {
    fn operation(&self) -> Operation {
        Operation::EmitDdlEvent
    }

    fn handle(&self, payload: &str) -> HandlerResult {
        info!("start execute ddl event");
        let ddl: DdlEvent = decode_payload(self.operation(), payload)?;

        self.sink.send_event(SinkEvent::DdlApplied {
            action_name: ddl.action_name().to_string(),
            table: ddl.table_info.as_ref().map(|t| t.to_string()),
            query: ddl.query,
            action: ddl.action,
            commit_ts: ddl.commit_ts,
        })?;

        info!("execute ddl event end");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sink::MemorySink;
    use crate::handlers::HandlerError;

    #[test]
    fn test_ddl_emits_one_summary() {
        let sink = Arc::new(MemorySink::new());
        let handler = EmitDdlEventHandler::new(sink.clone());

        handler
            .handle(
                r#"{"start-ts":1,"commit-ts":2,"query":"CREATE TABLE t (id INT)","type":3,
                    "table-info":{"db-name":"test","table":"t","table-id":61}}"#,
            )
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![SinkEvent::DdlApplied {
                query: "CREATE TABLE t (id INT)".to_string(),
                action: 3,
                action_name: "create table".to_string(),
                commit_ts: 2,
                table: Some("`test`.`t`".to_string()),
            }]
        );
    }

    #[test]
    fn test_schema_level_ddl_without_table() {
        let sink = Arc::new(MemorySink::new());
        let handler = EmitDdlEventHandler::new(sink.clone());

        handler
            .handle(r#"{"commit-ts":9,"query":"CREATE DATABASE d","type":1}"#)
            .unwrap();

        match &sink.events()[0] {
            SinkEvent::DdlApplied { table, action_name, .. } => {
                assert!(table.is_none());
                assert_eq!(action_name, "create schema");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_empty_object_is_rejected_without_summary() {
        let sink = Arc::new(MemorySink::new());
        let handler = EmitDdlEventHandler::new(sink.clone());

        let err = handler.handle("{}").unwrap_err();

        assert!(matches!(
            err,
            HandlerError::PayloadDecodeFailed {
                operation: Operation::EmitDdlEvent,
                ..
            }
        ));
        assert!(sink.is_empty());
    }
}
