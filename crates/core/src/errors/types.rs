//! Core error type definitions

/// Result type alias for skylift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for skylift operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or inconsistent artifact descriptors
    Assembly { artifact_id: String, message: String },

    /// Work graph construction or progress errors
    Graph { message: String },

    /// A deploy/build/publish handler reported failure
    Execution {
        node_id: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors
    Configuration { message: String },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
