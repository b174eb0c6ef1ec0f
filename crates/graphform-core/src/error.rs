//! Fatal build errors
//!
//! IMPORTANT: error codes are versioned and stable.
//! NEVER rename or remove codes - scripts match on them.

use serde::{Deserialize, Serialize};

/// Stable identifier for each build failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A node depends on a name no node carries
    MissingDependency,

    /// The dependency graph contains a cycle
    CircularDependency,

    /// Two entities share a node name
    DuplicateNodeName,
}

impl ErrorCode {
    /// Get the error code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingDependency => "MISSING_DEPENDENCY",
            Self::CircularDependency => "CIRCULAR_DEPENDENCY",
            Self::DuplicateNodeName => "DUPLICATE_NODE_NAME",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A graph that cannot be compiled into an execution graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Missing dependency detected: node \"{node}\" depends on \"{dependency}\" which does not exist.")]
    MissingDependency { node: String, dependency: String },

    #[error("Circular dependency detected in chain: [{}]", .chain.join(" > "))]
    CircularDependency {
        /// Traversal order, ending with the repeated node
        chain: Vec<String>,
    },

    #[error("Duplicate node name detected: \"{name}\" is declared more than once.")]
    DuplicateNodeName { name: String },
}

impl BuildError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingDependency { .. } => ErrorCode::MissingDependency,
            Self::CircularDependency { .. } => ErrorCode::CircularDependency,
            Self::DuplicateNodeName { .. } => ErrorCode::DuplicateNodeName,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_stability() {
        assert_eq!(ErrorCode::MissingDependency.as_str(), "MISSING_DEPENDENCY");
        assert_eq!(ErrorCode::CircularDependency.as_str(), "CIRCULAR_DEPENDENCY");
        assert_eq!(ErrorCode::DuplicateNodeName.as_str(), "DUPLICATE_NODE_NAME");

        let json = serde_json::to_string(&ErrorCode::CircularDependency).unwrap();
        assert_eq!(json, r#""CIRCULAR_DEPENDENCY""#);
    }

    #[test]
    fn missing_dependency_message_names_both_sides() {
        let err = BuildError::MissingDependency {
            node: "orders".to_string(),
            dependency: "customers".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("\"orders\""));
        assert!(message.contains("\"customers\""));
        assert!(message.contains("does not exist"));
        assert_eq!(err.code(), ErrorCode::MissingDependency);
    }

    #[test]
    fn cycle_message_lists_chain() {
        let err = BuildError::CircularDependency {
            chain: vec!["A".into(), "B".into(), "C".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "Circular dependency detected in chain: [A > B > C > A]");
    }
}
