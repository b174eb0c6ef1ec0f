//! Execution graph compilation
//!
//! This crate handles:
//! - Loading compiled graphs (materializations, operations, assertions)
//! - Translating entities into uniform execution nodes
//! - Validating dependencies (existence, uniqueness, cycles)
//! - Selecting a subset of nodes with optional dependency expansion

pub mod compiled;
pub mod matcher;
pub mod translate;
pub mod validate;
pub mod select;
pub mod builder;

pub use compiled::{CompiledGraph, GraphError};
pub use matcher::{matches, match_names};
pub use builder::build;
