//! Abstract Syntax Tree (AST) definitions for WRCI
//!
//! This module contains the AST node definitions for:
//! - Pipelines and their statements
//! - IF conditions and operators
//! - Rendering of the tree back to source text

pub mod operator;
pub mod pipeline;
pub mod source;

pub use operator::Operator;
pub use pipeline::{Assignment, Condition, ElseBranch, IfBlock, Message, Node, Pipeline, Step};
