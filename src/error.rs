//! Error types for Harbinger operations.

use thiserror::Error;

/// Main error type for Harbinger operations
#[derive(Error, Debug)]
pub enum HarbingerError {
    /// Input is not valid JSON or lacks the required `log.entries` array
    #[error("malformed HAR input: {0}")]
    MalformedHar(String),

    /// Invalid configuration in a named section
    #[error("invalid config in [{0}]: {1}")]
    InvalidConfig(String, String),

    /// A generation request that cannot be dispatched as given
    #[error("invalid generation request: {0}")]
    InvalidRequest(String),

    /// A referenced HAR file does not exist on disk
    #[error("HAR file not found: {0}")]
    HarFileNotFound(String),

    /// The agent command could not be spawned
    #[error("failed to spawn agent '{0}': {1}")]
    AgentSpawn(String, String),

    /// I/O against the running agent process failed
    #[error("agent I/O error: {0}")]
    AgentIo(String),

    /// The agent run exceeded the configured timeout and was killed
    #[error("agent run timed out after {0}s")]
    GenerationTimeout(u64),

    /// The capture backend failed — message relayed verbatim
    #[error("capture failed: {0}")]
    CaptureFailed(String),
}

/// Result type alias for Harbinger operations
pub type Result<T> = std::result::Result<T, HarbingerError>;
