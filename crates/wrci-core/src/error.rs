//! Error types for WRCI Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Invalid program: {0}")]
    InvalidProgram(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
