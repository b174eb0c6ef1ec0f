//! In-memory warehouse for testing
//!
//! Records every statement it is asked to run and answers from canned
//! results instead of connecting anywhere. Useful for:
//! - Exercising executors against a built execution graph
//! - Simulating query failures and latency
//!
//! ## Usage
//!
//! ```rust,ignore
//! let warehouse = MockWarehouse::new();
//! warehouse.add_result("select * from users where id is null", vec![]).await;
//!
//! let rows = warehouse.execute("select * from users where id is null").await?;
//! assert!(rows.is_empty());
//! assert_eq!(warehouse.executed().await.len(), 1);
//! ```

use crate::adapter::{AdapterError, Row, TableMetadata, Warehouse};
use graphform_core::{ExecutionTask, Materialization, RunConfig, Target, TaskBuilder};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock warehouse
///
/// Clones share state, so a clone handed to an executor can be inspected
/// afterwards.
pub struct MockWarehouse {
    /// Rows returned for an exact statement
    results: Arc<RwLock<HashMap<String, Vec<Row>>>>,

    /// Errors returned for an exact statement
    errors: Arc<RwLock<HashMap<String, AdapterError>>>,

    /// Known relations by `schema.name`
    tables: Arc<RwLock<HashMap<String, TableMetadata>>>,

    /// Schemas created through `prepare_schema`
    schemas: Arc<RwLock<BTreeSet<String>>>,

    /// Every statement passed to `execute`, in order
    executed: Arc<RwLock<Vec<String>>>,

    /// Fail every call with a network error
    fail_connection: bool,

    /// Simulated latency per call (milliseconds)
    latency_ms: u64,
}

impl MockWarehouse {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            tables: Arc::new(RwLock::new(HashMap::new())),
            schemas: Arc::new(RwLock::new(BTreeSet::new())),
            executed: Arc::new(RwLock::new(Vec::new())),
            fail_connection: false,
            latency_ms: 0,
        }
    }

    /// Return `rows` whenever exactly `sql` is executed
    pub async fn add_result(&self, sql: impl Into<String>, rows: Vec<Row>) {
        self.results.write().await.insert(sql.into(), rows);
    }

    /// Fail whenever exactly `sql` is executed or evaluated
    pub async fn add_error(&self, sql: impl Into<String>, error: AdapterError) {
        self.errors.write().await.insert(sql.into(), error);
    }

    pub async fn add_table(&self, metadata: TableMetadata) {
        self.tables.write().await.insert(metadata.target.to_string(), metadata);
    }

    /// Statements executed so far
    pub async fn executed(&self) -> Vec<String> {
        self.executed.read().await.clone()
    }

    /// Schemas prepared so far, sorted
    pub async fn prepared_schemas(&self) -> Vec<String> {
        self.schemas.read().await.iter().cloned().collect()
    }

    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    async fn simulate_call(&self) -> Result<(), AdapterError> {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }

        if self.fail_connection {
            return Err(AdapterError::NetworkError("Simulated connection failure".to_string()));
        }

        Ok(())
    }
}

impl Default for MockWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockWarehouse {
    fn clone(&self) -> Self {
        Self {
            results: Arc::clone(&self.results),
            errors: Arc::clone(&self.errors),
            tables: Arc::clone(&self.tables),
            schemas: Arc::clone(&self.schemas),
            executed: Arc::clone(&self.executed),
            fail_connection: self.fail_connection,
            latency_ms: self.latency_ms,
        }
    }
}

#[async_trait::async_trait]
impl Warehouse for MockWarehouse {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn execute(&self, sql: &str) -> Result<Vec<Row>, AdapterError> {
        self.simulate_call().await?;
        self.executed.write().await.push(sql.to_string());

        if let Some(error) = self.errors.read().await.get(sql) {
            return Err(error.clone());
        }

        Ok(self.results.read().await.get(sql).cloned().unwrap_or_default())
    }

    async fn evaluate(&self, sql: &str) -> Result<(), AdapterError> {
        self.simulate_call().await?;

        match self.errors.read().await.get(sql) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn list_tables(&self) -> Result<Vec<Target>, AdapterError> {
        self.simulate_call().await?;

        let mut targets: Vec<Target> = self
            .tables
            .read()
            .await
            .values()
            .map(|metadata| metadata.target.clone())
            .collect();
        targets.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
        Ok(targets)
    }

    async fn describe_table(&self, target: &Target) -> Result<TableMetadata, AdapterError> {
        self.simulate_call().await?;

        self.tables
            .read()
            .await
            .get(&target.to_string())
            .cloned()
            .ok_or_else(|| AdapterError::TableNotFound(target.to_string()))
    }

    async fn prepare_schema(&self, schema: &str) -> Result<(), AdapterError> {
        self.simulate_call().await?;
        self.schemas.write().await.insert(schema.to_string());
        Ok(())
    }
}

/// Unquoted, dialect-neutral tasks
impl TaskBuilder for MockWarehouse {
    fn build_tasks(&self, materialization: &Materialization, _run_config: &RunConfig) -> Vec<ExecutionTask> {
        let target = materialization.resolved_target("mock");
        vec![ExecutionTask::statement(format!(
            "create {} {} as {}",
            materialization.kind, target, materialization.query
        ))]
    }
}
