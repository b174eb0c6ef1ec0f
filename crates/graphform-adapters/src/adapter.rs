//! Warehouse adapter surface and shared task generation

use graphform_core::{ExecutionTask, Materialization, MaterializationKind, RunConfig, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One result row, keyed by column name
pub type Row = BTreeMap<String, serde_json::Value>;

/// Column of a warehouse relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,

    /// Warehouse-native type name
    pub data_type: String,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Metadata returned by [`Warehouse::describe_table`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub target: Target,

    /// Whether the relation is a view rather than a table
    #[serde(default)]
    pub is_view: bool,

    pub columns: Vec<ColumnMetadata>,
}

/// Errors that can occur when talking to a warehouse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Operations an executor needs from a warehouse
///
/// The graph builder never calls these; it only consumes
/// [`graphform_core::TaskBuilder`].
#[async_trait::async_trait]
pub trait Warehouse: Send + Sync {
    /// Get the adapter name (e.g., "BigQuery", "Snowflake")
    fn name(&self) -> &'static str;

    /// Run a statement and return its rows
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, AdapterError>;

    /// Validate a statement without running it (dry run)
    async fn evaluate(&self, sql: &str) -> Result<(), AdapterError>;

    /// List every relation visible to the connection
    async fn list_tables(&self) -> Result<Vec<Target>, AdapterError>;

    async fn describe_table(&self, target: &Target) -> Result<TableMetadata, AdapterError>;

    /// Create the schema if it does not exist
    async fn prepare_schema(&self, schema: &str) -> Result<(), AdapterError>;
}

/// How a dialect replaces an existing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableReplace {
    /// `create or replace table`
    CreateOrReplace,

    /// `drop table if exists ... cascade` followed by `create table`
    DropAndCreate,
}

/// Tasks that build a materialization into an already-quoted relation name
///
/// Incremental materializations only append when a where clause exists and
/// the run is not a full refresh; otherwise they are rebuilt like tables.
pub(crate) fn materialization_tasks(
    materialization: &Materialization,
    run_config: &RunConfig,
    relation: &str,
    replace: TableReplace,
) -> Vec<ExecutionTask> {
    let query = materialization.query.trim().trim_end_matches(';');

    match (materialization.kind, materialization.where_clause.as_deref()) {
        (MaterializationKind::View, _) => {
            vec![ExecutionTask::statement(format!("create or replace view {} as {}", relation, query))]
        }
        (MaterializationKind::Incremental, Some(filter)) if !run_config.full_refresh => vec![
            ExecutionTask::statement(format!(
                "create table if not exists {} as select * from ({}) as insertions where false",
                relation, query
            )),
            ExecutionTask::statement(format!(
                "insert into {} select * from ({}) as insertions where {}",
                relation, query, filter
            )),
        ],
        _ => match replace {
            TableReplace::CreateOrReplace => {
                vec![ExecutionTask::statement(format!("create or replace table {} as {}", relation, query))]
            }
            TableReplace::DropAndCreate => vec![
                ExecutionTask::statement(format!("drop table if exists {} cascade", relation)),
                ExecutionTask::statement(format!("create table {} as {}", relation, query)),
            ],
        },
    }
}

/// Wrap an identifier in `quote`, doubling embedded quote characters
pub(crate) fn quote_identifier(identifier: &str, quote: char) -> String {
    let escaped = identifier.replace(quote, &format!("{}{}", quote, quote));
    format!("{}{}{}", quote, escaped, quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_semicolon_is_dropped() {
        let m = Materialization::new("t", "select 1;\n");
        let tasks = materialization_tasks(&m, &RunConfig::default(), "t", TableReplace::CreateOrReplace);
        assert_eq!(tasks[0].statement, "create or replace table t as select 1");
    }

    #[test]
    fn incremental_without_filter_is_a_table() {
        let m = Materialization::new("t", "select 1").with_kind(MaterializationKind::Incremental);
        let tasks = materialization_tasks(&m, &RunConfig::default(), "t", TableReplace::DropAndCreate);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].statement, "drop table if exists t cascade");
    }

    #[test]
    fn quoting_escapes_quote_characters() {
        assert_eq!(quote_identifier("a\"b", '"'), "\"a\"\"b\"");
        assert_eq!(quote_identifier("plain", '`'), "`plain`");
    }
}
