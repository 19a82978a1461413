//! WRCI Core - Core types and definitions for the WRCI pipeline language
//!
//! This crate provides the fundamental types shared by the parser and the runtime:
//! - AST (Abstract Syntax Tree) definitions
//! - The variable environment
//! - The parsed `Program` handed from the parser to the executor
//! - Error types

pub mod ast;
pub mod error;
pub mod program;
pub mod types;

// Re-export commonly used types
pub use ast::{Node, Operator, Pipeline};
pub use error::CoreError;
pub use program::Program;
pub use types::Variables;
