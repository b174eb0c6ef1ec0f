//! Snowflake task generation
//!
//! Snowflake folds unquoted identifiers to upper case, so relations are
//! upper-cased before quoting to keep them addressable without quotes.

use graphform_core::{ExecutionTask, Materialization, ProjectConfig, RunConfig, Target, TaskBuilder};

use crate::adapter::{materialization_tasks, quote_identifier, TableReplace};

/// Snowflake adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnowflakeAdapter {
    /// Optional database prefix
    database: Option<String>,

    default_schema: String,
}

impl SnowflakeAdapter {
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            database: None,
            default_schema: default_schema.into(),
        }
    }

    /// Build from project config, reading the `database` setting
    pub fn from_config(config: &ProjectConfig) -> Self {
        let adapter = Self::new(config.default_schema.clone());
        match config.setting("database") {
            Some(database) => adapter.with_database(database),
            None => adapter,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn resolve_target(&self, target: &Target) -> String {
        let parts = self
            .database
            .iter()
            .map(String::as_str)
            .chain([target.schema.as_str(), target.name.as_str()]);

        parts
            .map(|part| quote_identifier(&part.to_uppercase(), '"'))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl TaskBuilder for SnowflakeAdapter {
    fn build_tasks(&self, materialization: &Materialization, run_config: &RunConfig) -> Vec<ExecutionTask> {
        let target = materialization.resolved_target(&self.default_schema);
        materialization_tasks(
            materialization,
            run_config,
            &self.resolve_target(&target),
            TableReplace::CreateOrReplace,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphform_core::MaterializationKind;

    #[test]
    fn identifiers_are_upper_cased_and_quoted() {
        let adapter = SnowflakeAdapter::new("analytics").with_database("prod");
        assert_eq!(
            adapter.resolve_target(&Target::new("analytics", "users")),
            "\"PROD\".\"ANALYTICS\".\"USERS\""
        );
    }

    #[test]
    fn table_uses_create_or_replace() {
        let adapter = SnowflakeAdapter::new("analytics");
        let tasks = adapter.build_tasks(&Materialization::new("users", "select 1"), &RunConfig::default());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].statement, "create or replace table \"ANALYTICS\".\"USERS\" as select 1");
    }

    #[test]
    fn explicit_target_is_respected() {
        let adapter = SnowflakeAdapter::new("analytics");
        let m = Materialization::new("users", "select 1")
            .with_kind(MaterializationKind::View)
            .with_target(Target::new("marts", "dim_users"));

        let tasks = adapter.build_tasks(&m, &RunConfig::default());
        assert_eq!(tasks[0].statement, "create or replace view \"MARTS\".\"DIM_USERS\" as select 1");
    }
}
