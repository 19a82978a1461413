//! Pipeline AST definitions
//!
//! A pipeline file is a tree of statements rooted at a single `PIPELINE`
//! block. Blocks (`PIPELINE`, `IF`/`ELSE`) own their bodies directly; the
//! only back-reference in the surface syntax, `ELSE` attaching to the
//! preceding `IF`, is resolved by the parser into `IfBlock::else_branch`.

use crate::ast::Operator;
use serde::{Deserialize, Serialize};

/// A pipeline groups statements and optionally binds them to a helper container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Container identity; required to create or look up a container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Image for a new helper container; `None` runs in the parent's container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_image: Option<String>,

    /// Command the helper container is started with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,

    /// Statements, in execution order
    #[serde(default)]
    pub body: Vec<Node>,
}

impl Pipeline {
    /// Create an anonymous pipeline with no container binding
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pipeline name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the helper image
    pub fn with_helper_image(mut self, image: impl Into<String>) -> Self {
        self.helper_image = Some(image.into());
        self
    }

    /// Set the start command
    pub fn with_start_command(mut self, command: impl Into<String>) -> Self {
        self.start_command = Some(command.into());
        self
    }

    /// Append a statement to the body
    pub fn with_node(mut self, node: Node) -> Self {
        self.body.push(node);
        self
    }

    /// The `PIPELINE(...)` parameters that are set, in canonical order
    pub fn parameters(&self) -> Vec<(&'static str, &str)> {
        [
            ("helper_image", self.helper_image.as_deref()),
            ("start_command", self.start_command.as_deref()),
            ("name", self.name.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// A single statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Node {
    /// Nested pipeline block
    Pipeline(Pipeline),

    /// Script invocation inside the current container
    Step(Step),

    /// Conditional block with optional attached ELSE
    If(IfBlock),

    /// Message with `$name` placeholders
    Msg(Message),

    /// Variable assignment
    Assign(Assignment),

    /// Unconditional early termination of the whole run
    Exit,
}

impl Node {
    pub fn step(script: impl Into<String>) -> Self {
        Node::Step(Step {
            script: script.into(),
        })
    }

    pub fn msg(template: impl Into<String>) -> Self {
        Node::Msg(Message {
            template: template.into(),
        })
    }

    pub fn assign(name: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Assign(Assignment {
            name: name.into(),
            value: value.into(),
        })
    }

    /// Source keyword of the statement, used in diagnostics
    pub fn keyword(&self) -> &'static str {
        match self {
            Node::Pipeline(_) => "PIPELINE",
            Node::Step(_) => "STEP",
            Node::If(_) => "IF",
            Node::Msg(_) => "MSG",
            Node::Assign(_) => "ASSIGN",
            Node::Exit => "EXIT",
        }
    }
}

/// `STEP <script>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Script path relative to the pipeline's mount directory
    pub script: String,
}

/// `IF $VAR == "LITERAL":` ... `[ELSE:` ... `]` `END`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfBlock {
    pub condition: Condition,

    /// Statements executed when the condition holds
    #[serde(default)]
    pub body: Vec<Node>,

    /// Statements executed when it does not
    #[serde(default, rename = "else", skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<ElseBranch>,
}

impl IfBlock {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            body: Vec::new(),
            else_branch: None,
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.body.push(node);
        self
    }

    pub fn with_else(mut self, body: Vec<Node>) -> Self {
        self.else_branch = Some(ElseBranch { body });
        self
    }
}

/// Body of an `ELSE:` attached to an `IF`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElseBranch {
    #[serde(default)]
    pub body: Vec<Node>,
}

/// Single-variable comparison against a literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Variable name, without the leading `$`
    pub variable: String,
    pub operator: Operator,
    pub literal: String,
}

impl Condition {
    pub fn new(variable: impl Into<String>, operator: Operator, literal: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            operator,
            literal: literal.into(),
        }
    }

    /// Evaluate against the current value of the variable (`None` if unbound)
    pub fn matches(&self, actual: Option<&str>) -> bool {
        self.operator.compare(actual, &self.literal)
    }
}

/// `MSG("...")`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub template: String,
}

/// `$NAME = "value"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}
