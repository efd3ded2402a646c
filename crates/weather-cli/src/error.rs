//! Error types for the CLI

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the terminal
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from the agent client (transport, bridge, conversation)
    #[error(transparent)]
    Agent(#[from] weather_agent::Error),

    /// Error from the language-model provider
    #[error(transparent)]
    Llm(#[from] weather_agent::LlmError),

    /// IO error reading from the terminal
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
