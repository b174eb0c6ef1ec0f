//! Source entities and the execution graph they compile into

use serde::{Deserialize, Serialize};
use crate::config::ProjectConfig;

/// How a materialization is persisted in the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterializationKind {
    /// Rebuilt from scratch on every run
    #[default]
    Table,

    /// Stored as a view over its query
    View,

    /// Appended to, filtered by a where clause, unless fully refreshed
    Incremental,
}

impl std::fmt::Display for MaterializationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::View => write!(f, "view"),
            Self::Incremental => write!(f, "incremental"),
        }
    }
}

/// A relation in the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Schema (dataset) name
    pub schema: String,

    /// Relation name
    pub name: String,
}

impl Target {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A materialized relation (table, view or incremental table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materialization {
    /// Unique node name
    pub name: String,

    /// Names (or wildcard patterns) of nodes this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Materialization type
    #[serde(default, rename = "type")]
    pub kind: MaterializationKind,

    /// SELECT statement producing the relation
    #[serde(default)]
    pub query: String,

    /// Output relation; defaults to the project schema and the node name
    #[serde(default)]
    pub target: Option<Target>,

    /// Filter applied to incremental inserts
    #[serde(default, rename = "where")]
    pub where_clause: Option<String>,

    /// Statements run before the relation is built
    #[serde(default)]
    pub pres: Vec<String>,

    /// Statements run after the relation is built
    #[serde(default)]
    pub posts: Vec<String>,

    /// Assertion queries local to this materialization
    #[serde(default)]
    pub assertions: Vec<String>,
}

impl Materialization {
    /// Create a table materialization with no dependencies or hooks
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            kind: MaterializationKind::Table,
            query: query.into(),
            target: None,
            where_clause: None,
            pres: Vec::new(),
            posts: Vec::new(),
            assertions: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: MaterializationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_where(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    /// Resolve the output relation against a default schema
    pub fn resolved_target(&self, default_schema: &str) -> Target {
        self.target
            .clone()
            .unwrap_or_else(|| Target::new(default_schema, self.name.clone()))
    }
}

/// An arbitrary sequence of SQL statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,

    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Statements executed in declared order
    #[serde(default)]
    pub statements: Vec<String>,
}

/// Standalone data-quality assertion
///
/// Each query passes when it returns zero rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub name: String,

    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub queries: Vec<String>,
}

/// How the executor treats a task's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Executed for side effect only
    Statement,

    /// A non-empty result set is a failure
    Assertion,
}

/// One SQL statement to run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionTask {
    #[serde(rename = "type")]
    pub task_type: TaskType,

    pub statement: String,
}

impl ExecutionTask {
    pub fn statement(sql: impl Into<String>) -> Self {
        Self {
            task_type: TaskType::Statement,
            statement: sql.into(),
        }
    }

    pub fn assertion(sql: impl Into<String>) -> Self {
        Self {
            task_type: TaskType::Assertion,
            statement: sql.into(),
        }
    }
}

/// Unit of work in the execution graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionNode {
    pub name: String,

    /// Declared dependencies, narrowed to the selected nodes once built
    pub dependencies: Vec<String>,

    /// Ordered tasks
    pub tasks: Vec<ExecutionTask>,
}

/// Caller-supplied run intent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Node selectors (exact names or `*` patterns); empty selects everything
    #[serde(default)]
    pub nodes: Vec<String>,

    /// Expand the selection to its transitive dependencies
    #[serde(default)]
    pub include_dependencies: bool,

    /// Rebuild incremental materializations from scratch
    #[serde(default)]
    pub full_refresh: bool,
}

impl RunConfig {
    /// Run configuration selecting the given nodes
    pub fn select<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_dependencies(mut self) -> Self {
        self.include_dependencies = true;
        self
    }

    pub fn with_full_refresh(mut self) -> Self {
        self.full_refresh = true;
        self
    }
}

/// Build output: the nodes to run and the configuration they were built for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionGraph {
    pub project_config: ProjectConfig,
    pub run_config: RunConfig,
    pub nodes: Vec<ExecutionNode>,
}

impl ExecutionGraph {
    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&ExecutionNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Names of all nodes, in graph order
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.name.as_str()).collect()
    }

    /// Total number of tasks across all nodes
    pub fn task_count(&self) -> usize {
        self.nodes.iter().map(|node| node.tasks.len()).sum()
    }
}

/// Produces the dialect-specific tasks that build a materialization
///
/// Implementations must be pure code generation: no I/O, no side effects.
pub trait TaskBuilder {
    fn build_tasks(&self, materialization: &Materialization, run_config: &RunConfig) -> Vec<ExecutionTask>;
}

impl<F> TaskBuilder for F
where
    F: Fn(&Materialization, &RunConfig) -> Vec<ExecutionTask>,
{
    fn build_tasks(&self, materialization: &Materialization, run_config: &RunConfig) -> Vec<ExecutionTask> {
        self(materialization, run_config)
    }
}
