//! PostgreSQL task generation
//!
//! Also covers Redshift and other PostgreSQL-compatible warehouses. There is
//! no `create or replace table`, so tables are dropped and recreated.

use graphform_core::{ExecutionTask, Materialization, ProjectConfig, RunConfig, Target, TaskBuilder};

use crate::adapter::{materialization_tasks, quote_identifier, TableReplace};

/// PostgreSQL adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresAdapter {
    default_schema: String,
}

impl PostgresAdapter {
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
        }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.default_schema.clone())
    }

    pub fn resolve_target(&self, target: &Target) -> String {
        format!(
            "{}.{}",
            quote_identifier(&target.schema, '"'),
            quote_identifier(&target.name, '"')
        )
    }
}

impl TaskBuilder for PostgresAdapter {
    fn build_tasks(&self, materialization: &Materialization, run_config: &RunConfig) -> Vec<ExecutionTask> {
        let target = materialization.resolved_target(&self.default_schema);
        materialization_tasks(
            materialization,
            run_config,
            &self.resolve_target(&target),
            TableReplace::DropAndCreate,
        )
    }
}
