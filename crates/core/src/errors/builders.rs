//! Builder methods for creating errors with context

use super::types::Error;

// Helper methods for creating errors with context
impl Error {
    /// Create an assembly error for a specific artifact
    #[must_use]
    pub fn assembly(artifact_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Assembly {
            artifact_id: artifact_id.into(),
            message: message.into(),
        }
    }

    /// Create a work graph error
    #[must_use]
    pub fn graph(message: impl Into<String>) -> Self {
        Error::Graph {
            message: message.into(),
        }
    }

    /// Create an execution error for a work node
    #[must_use]
    pub fn execution(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            node_id: node_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an execution error carrying the handler's underlying error
    #[must_use]
    pub fn execution_with_source(
        node_id: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let source = source.into();
        Error::Execution {
            node_id: node_id.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
