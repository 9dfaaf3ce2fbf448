//! Payload shapes carried in the envelope `data` field
//!
//! Table requests are plugin-specific. Row and DDL events follow the JSON
//! layout TiCDC uses for its `RowChangedEvent` and `DDLEvent` models, with
//! kebab-case keys. Only the fields the handlers look at are modelled; any
//! other key is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Start replicating a table to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTableRequest {
    pub table_id: i64,
}

/// Stop replicating a table to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTableRequest {
    pub table_id: i64,
}

/// Fully qualified table a row belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableName {
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub tbl_name: String,
    #[serde(default)]
    pub tbl_id: i64,
    #[serde(default)]
    pub is_partition: bool,
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`.`{}`", self.db_name, self.tbl_name)
    }
}

/// A single column value of a changed row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub name: String,
    /// MySQL type code
    #[serde(rename = "type", default)]
    pub column_type: u8,
    #[serde(default)]
    pub flag: u64,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// One row mutation
///
/// `columns` holds the row after the change and `pre_columns` the row before
/// it. TiCDC leaves `null` slots for columns it skips; they keep their
/// position so column indexes stay aligned with the table schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RowChangedEvent {
    #[serde(default)]
    pub start_ts: u64,
    #[serde(default)]
    pub commit_ts: u64,
    #[serde(default)]
    pub row_id: i64,
    #[serde(default)]
    pub table: Option<TableName>,
    #[serde(default)]
    pub columns: Option<Vec<Option<Column>>>,
    #[serde(default)]
    pub pre_columns: Option<Vec<Option<Column>>>,
}

impl RowChangedEvent {
    /// Columns after the change, empty when absent
    pub fn columns(&self) -> &[Option<Column>] {
        self.columns.as_deref().unwrap_or_default()
    }

    /// Row kind derived from which column sets are present
    pub fn kind(&self) -> RowChangeKind {
        let has_after = !self.columns().is_empty();
        let has_before = self.pre_columns.as_deref().is_some_and(|c| !c.is_empty());

        match (has_before, has_after) {
            (true, true) => RowChangeKind::Update,
            (true, false) => RowChangeKind::Delete,
            _ => RowChangeKind::Insert,
        }
    }

    /// Display name of the owning table, or `unknown` when absent
    pub fn table_display(&self) -> String {
        self.table
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowChangeKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for RowChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowChangeKind::Insert => write!(f, "insert"),
            RowChangeKind::Update => write!(f, "update"),
            RowChangeKind::Delete => write!(f, "delete"),
        }
    }
}

/// Column metadata attached to DDL table info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: u8,
}

/// Table a DDL statement applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimpleTableInfo {
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub table_id: i64,
    #[serde(default)]
    pub column_info: Option<Vec<ColumnInfo>>,
}

impl fmt::Display for SimpleTableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.table.is_empty() {
            write!(f, "`{}`", self.db_name)
        } else {
            write!(f, "`{}`.`{}`", self.db_name, self.table)
        }
    }
}

/// A schema change
///
/// `commit-ts`, `query` and `type` are required: a DDL without a statement
/// or a commit point cannot be applied downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DdlEvent {
    #[serde(default)]
    pub start_ts: u64,
    pub commit_ts: u64,
    pub query: String,
    #[serde(rename = "type")]
    pub action: u8,
    #[serde(default)]
    pub table_info: Option<SimpleTableInfo>,
    #[serde(default)]
    pub pre_table_info: Option<SimpleTableInfo>,
}

impl DdlEvent {
    /// TiDB name of the DDL action type
    pub fn action_name(&self) -> &'static str {
        ddl_action_name(self.action)
    }
}

/// Map a TiDB DDL action code to its name
pub fn ddl_action_name(action: u8) -> &'static str {
    match action {
        1 => "create schema",
        2 => "drop schema",
        3 => "create table",
        4 => "drop table",
        5 => "add column",
        6 => "drop column",
        7 => "add index",
        8 => "drop index",
        9 => "add foreign key",
        10 => "drop foreign key",
        11 => "truncate table",
        12 => "modify column",
        13 => "rebase auto_increment ID",
        14 => "rename table",
        15 => "set default value",
        16 => "shard row ID",
        17 => "modify table comment",
        18 => "rename index",
        19 => "add partition",
        20 => "drop partition",
        21 => "create view",
        22 => "modify table charset and collate",
        23 => "truncate partition",
        24 => "drop view",
        25 => "recover table",
        26 => "modify schema charset and collate",
        27 => "lock table",
        28 => "unlock table",
        29 => "repair table",
        30 => "set tiflash replica",
        31 => "update tiflash replica status",
        32 => "add primary key",
        33 => "drop primary key",
        34 => "create sequence",
        35 => "alter sequence",
        36 => "drop sequence",
        37 => "add columns",
        38 => "drop columns",
        39 => "modify table auto id cache",
        40 => "rebase auto_random ID",
        41 => "alter index visibility",
        42 => "exchange partition",
        43 => "add check constraint",
        44 => "drop check constraint",
        45 => "alter check constraint",
        46 => "alter table alter partition",
        47 => "rename tables",
        48 => "drop indexes",
        49 => "alter table attributes",
        50 => "alter table partition attributes",
        51 => "create placement policy",
        52 => "alter placement policy",
        53 => "drop placement policy",
        54 => "alter table partition placement",
        55 => "modify schema default placement",
        56 => "alter table placement",
        57 => "alter cache table",
        58 => "alter table stats options",
        59 => "alter no cache table",
        60 => "create tables",
        61 => "multi-schema change",
        62 => "flashback cluster",
        63 => "recover schema",
        64 => "reorganize partition",
        65 => "alter TTL info",
        67 => "alter TTL remove",
        68 => "create resource group",
        69 => "alter resource group",
        70 => "drop resource group",
        71 => "alter table partitioning",
        72 => "remove partitioning",
        _ => "unknown",
    }
}
