//! Graphform Core
//!
//! Core domain model shared by the graph builder, the warehouse adapters
//! and the CLI. Error codes are part of the public API and never renamed.

pub mod model;
pub mod config;
pub mod error;

pub use model::{
    Materialization, MaterializationKind, Operation, Assertion, Target,
    TaskType, ExecutionTask, ExecutionNode, ExecutionGraph, RunConfig, TaskBuilder,
};
pub use config::{ProjectConfig, WarehouseType, ConfigError};
pub use error::{BuildError, ErrorCode};
