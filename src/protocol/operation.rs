//! The closed set of sink operations a CDC owner can send to the plugin

use std::fmt;
use std::str::FromStr;

/// A sink operation understood by the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddTable,
    RemoveTable,
    EmitRowChangedEvents,
    EmitDdlEvent,
}

impl Operation {
    /// Every supported operation, in registration order
    pub const ALL: [Operation; 4] = [
        Operation::AddTable,
        Operation::RemoveTable,
        Operation::EmitRowChangedEvents,
        Operation::EmitDdlEvent,
    ];

    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AddTable => "sink_add_table",
            Operation::RemoveTable => "sink_remove_table",
            Operation::EmitRowChangedEvents => "sink_emit_row_changed_events",
            Operation::EmitDdlEvent => "sink_emit_ddl_event",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a wire name is not one of [`Operation::ALL`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation '{0}'")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}
