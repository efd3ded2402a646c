//! Error types for the agent client

use thiserror::Error;

use crate::llm::LlmError;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the agent client
#[derive(Debug, Error)]
pub enum Error {
    /// The caller omitted a parameter the tool's schema marks as required.
    /// Reported for the first missing parameter in the schema's `required`
    /// declaration order; surfaced to the model as text, never raised across
    /// the invocation boundary.
    #[error("missing required argument '{parameter}' for tool '{tool}'")]
    MissingArgument { tool: String, parameter: String },

    /// A schema property declares a type with no mapping in the parameter
    /// contract. The bridge degrades this to a string-like parameter instead
    /// of rejecting the tool.
    #[error("unsupported schema type '{type_name}' for parameter '{parameter}'")]
    UnsupportedSchemaType {
        parameter: String,
        type_name: String,
    },

    /// Adapter invoked with something other than a JSON object
    #[error("tool arguments must be a JSON object, got {got}")]
    InvalidArguments { got: String },

    /// The transport to the tool server failed
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a malformed or error response
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Error from the language-model provider
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
