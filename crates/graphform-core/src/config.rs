//! Project configuration (graphform.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Environment variable overriding the credentials reference
pub const CREDENTIALS_ENV: &str = "GRAPHFORM_CREDENTIALS";

/// Warehouse dialect the project targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseType {
    /// Google BigQuery
    BigQuery,

    /// Snowflake
    Snowflake,

    /// PostgreSQL and Redshift
    Postgres,
}

impl Default for WarehouseType {
    fn default() -> Self {
        Self::BigQuery
    }
}

impl std::fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BigQuery => write!(f, "bigquery"),
            Self::Snowflake => write!(f, "snowflake"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

/// Project-wide settings
///
/// The builder passes this through to the execution graph untouched; only
/// adapter selection looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Target warehouse
    #[serde(default)]
    pub warehouse: WarehouseType,

    /// Schema for materializations without an explicit target
    #[serde(default = "default_schema")]
    pub default_schema: String,

    /// Schema holding assertion results
    #[serde(default = "default_assertion_schema")]
    pub assertion_schema: String,

    /// Reference to a credentials file (never read by the builder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    /// Dialect-specific settings (e.g. BigQuery `project_id`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

fn default_schema() -> String {
    "graphform".to_string()
}

fn default_assertion_schema() -> String {
    "graphform_assertions".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            warehouse: WarehouseType::default(),
            default_schema: default_schema(),
            assertion_schema: default_assertion_schema(),
            credentials: None,
            settings: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Replace the credentials reference with `GRAPHFORM_CREDENTIALS` if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(credentials) = std::env::var(CREDENTIALS_ENV) {
            if !credentials.is_empty() {
                self.credentials = Some(credentials);
            }
        }
        self
    }

    /// Get a dialect-specific setting
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
