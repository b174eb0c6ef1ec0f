//! BigQuery task generation
//!
//! Relations are written as a single backtick-quoted path,
//! `` `project.dataset.table` ``, with the project omitted when not configured.

use graphform_core::{ExecutionTask, Materialization, ProjectConfig, RunConfig, Target, TaskBuilder};

use crate::adapter::{materialization_tasks, quote_identifier, TableReplace};

/// BigQuery adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigQueryAdapter {
    /// GCP project id prefixed to every relation
    project_id: Option<String>,

    /// Dataset for materializations without an explicit target
    default_schema: String,
}

impl BigQueryAdapter {
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            project_id: None,
            default_schema: default_schema.into(),
        }
    }

    /// Build from project config, reading the `project_id` setting
    pub fn from_config(config: &ProjectConfig) -> Self {
        let adapter = Self::new(config.default_schema.clone());
        match config.setting("project_id") {
            Some(project_id) => adapter.with_project(project_id),
            None => adapter,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Fully qualified, quoted relation name
    pub fn resolve_target(&self, target: &Target) -> String {
        let path = match &self.project_id {
            Some(project) => format!("{}.{}.{}", project, target.schema, target.name),
            None => format!("{}.{}", target.schema, target.name),
        };
        quote_identifier(&path, '`')
    }
}

impl TaskBuilder for BigQueryAdapter {
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
