//! Warehouse adapters
//!
//! Each dialect implements [`graphform_core::TaskBuilder`], turning a
//! materialization into the statements that build it. The async
//! [`Warehouse`] trait describes what an executor needs from a live
//! connection; only the in-memory [`MockWarehouse`] implements it here.
//!
//! ## Example
//!
//! ```rust,ignore
//! use graphform_adapters::adapter_for;
//! use graphform_graph::{build, CompiledGraph};
//!
//! let graph = CompiledGraph::from_file(path)?;
//! let adapter = adapter_for(&graph.project_config)?;
//! let execution = build(&graph, &run_config, adapter.as_ref())?;
//! ```

pub mod adapter;
pub mod bigquery;
pub mod snowflake;
pub mod postgres;
pub mod mock;

pub use adapter::{AdapterError, ColumnMetadata, Row, TableMetadata, Warehouse};
pub use bigquery::BigQueryAdapter;
pub use snowflake::SnowflakeAdapter;
pub use postgres::PostgresAdapter;
pub use mock::MockWarehouse;

use graphform_core::{ProjectConfig, TaskBuilder, WarehouseType};

/// Pick the task builder for the project's warehouse
pub fn adapter_for(config: &ProjectConfig) -> Result<Box<dyn TaskBuilder + Send + Sync>, AdapterError> {
    if config.default_schema.trim().is_empty() {
        return Err(AdapterError::ConfigError(
            "default_schema must not be empty".to_string(),
        ));
    }

    tracing::debug!(warehouse = %config.warehouse, "selecting adapter");

    let adapter: Box<dyn TaskBuilder + Send + Sync> = match config.warehouse {
        WarehouseType::BigQuery => Box::new(BigQueryAdapter::from_config(config)),
        WarehouseType::Snowflake => Box::new(SnowflakeAdapter::from_config(config)),
        WarehouseType::Postgres => Box::new(PostgresAdapter::from_config(config)),
    };

    Ok(adapter)
}
