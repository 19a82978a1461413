//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Syntax error: {0}")]
    ParseError(#[from] wrci_parser::ParseError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] wrci_runtime::RuntimeError),

    /// I/O error while reading a pipeline file
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for SdkError {
    fn from(err: config::ConfigError) -> Self {
        SdkError::ConfigError(err.to_string())
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
