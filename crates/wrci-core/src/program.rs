//! Parsed program: the root pipeline plus the variables seeded at parse time

use crate::ast::{Node, Pipeline};
use crate::error::{CoreError, Result};
use crate::types::Variables;
use serde::{Deserialize, Serialize};

/// Output of the parser and input of the executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// The single outermost pipeline
    pub root: Pipeline,

    /// Initial variable environment
    pub variables: Variables,
}

impl Program {
    /// Create a program from a root pipeline, seeding variables from its parameters
    pub fn new(root: Pipeline) -> Self {
        let variables = seed_variables(&root);
        Self { root, variables }
    }

    /// Build a program from the top-level statements of a file
    ///
    /// The top level must consist of exactly one `PIPELINE` block.
    pub fn from_top_level(mut nodes: Vec<Node>) -> Result<Self> {
        if nodes.len() != 1 {
            return Err(CoreError::InvalidProgram(format!(
                "top level must contain exactly one PIPELINE block, found {} statements",
                nodes.len()
            )));
        }

        match nodes.pop() {
            Some(Node::Pipeline(root)) => Ok(Self::new(root)),
            Some(other) => Err(CoreError::InvalidProgram(format!(
                "top level must be a PIPELINE block, found {}",
                other.keyword()
            ))),
            None => Err(CoreError::InvalidProgram(
                "top level must contain exactly one PIPELINE block".to_string(),
            )),
        }
    }

    /// Render the program as pipeline source text
    pub fn to_source(&self) -> String {
        self.root.to_string()
    }
}

/// The root pipeline's parameters become variables under their own names
fn seed_variables(root: &Pipeline) -> Variables {
    root.parameters().into_iter().collect()
}
