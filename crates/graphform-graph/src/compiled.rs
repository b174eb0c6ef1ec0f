//! Compiled graph parsing
//!
//! The compiled graph is produced upstream from project sources; this module
//! only reads it.

use graphform_core::{Assertion, Materialization, Operation, ProjectConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input to the builder: every entity declared by a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledGraph {
    #[serde(default)]
    pub project_config: ProjectConfig,

    #[serde(default)]
    pub materializations: Vec<Materialization>,

    #[serde(default)]
    pub operations: Vec<Operation>,

    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl CompiledGraph {
    /// Load a compiled graph from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GraphError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse a compiled graph from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json)
            .map_err(|e| GraphError::ParseError(e.to_string()))
    }

    /// Number of entities across all kinds
    pub fn entity_count(&self) -> usize {
        self.materializations.len() + self.operations.len() + self.assertions.len()
    }
}

/// Compiled graph loading errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Failed to read compiled graph {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse compiled graph JSON: {0}")]
    ParseError(String),
}
