//! WRCI Parser - pipeline source to AST parser
//!
//! This crate turns pipeline files into a `wrci_core::Program`:
//! - `Tokenizer` drops blank lines and comments
//! - `grammar` classifies each line into a statement
//! - `PipelineParser` assembles statements into nested blocks

pub mod error;
pub mod grammar;
pub mod parser;
pub mod tokenizer;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use grammar::Statement;
pub use parser::{PipelineParser, MAX_NESTING_DEPTH};
pub use tokenizer::{SourceLine, Tokenizer};
