//! Runtime error types

use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Pipeline cannot be bound to a container
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Container runtime reported a failure
    #[error("Container {operation} failed for '{target}': {message}")]
    Adapter {
        operation: &'static str,
        target: String,
        message: String,
    },

    /// Malformed bind mount specification
    #[error("Invalid mount '{0}': expected host_path:container_path")]
    InvalidMount(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Build an adapter failure
    pub fn adapter(
        operation: &'static str,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RuntimeError::Adapter {
            operation,
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
