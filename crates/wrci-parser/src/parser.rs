//! Block parser
//!
//! Statements are appended to the innermost open block. While parsing, nodes
//! live in a flat arena and blocks refer to their children by index; an
//! explicit stack records which blocks are still open. Once the input is
//! exhausted and every block is closed, the arena is folded into the owned
//! AST and dropped.

use crate::error::{ParseError, Result};
use crate::grammar::Statement;
use crate::tokenizer::{SourceLine, Tokenizer};
use wrci_core::ast::{Condition, ElseBranch, IfBlock, Node, Pipeline};
use wrci_core::Program;

type NodeId = usize;

/// Maximum number of PIPELINE/IF blocks open at the same time
pub const MAX_NESTING_DEPTH: usize = 256;

/// Node under construction
enum Draft {
    Leaf(Node),
    Pipeline {
        header: Pipeline,
        body: Vec<NodeId>,
    },
    If {
        condition: Condition,
        body: Vec<NodeId>,
        else_body: Option<Vec<NodeId>>,
    },
}

/// Which child list of an open block receives new statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Body,
    Else,
}

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    id: NodeId,
    branch: Branch,
    /// Line that opened the block (or the ELSE that switched it)
    line: usize,
}

/// Parser-local arena plus open-block stack
#[derive(Default)]
struct BlockBuilder {
    arena: Vec<Draft>,
    roots: Vec<NodeId>,
    stack: Vec<OpenBlock>,
}

impl BlockBuilder {
    fn apply(&mut self, line: &SourceLine, statement: Statement) -> Result<()> {
        match statement {
            Statement::PipelineOpen(header) => self.open(
                Draft::Pipeline {
                    header,
                    body: Vec::new(),
                },
                line.number,
            )?,
            Statement::IfOpen(condition) => self.open(
                Draft::If {
                    condition,
                    body: Vec::new(),
                    else_body: None,
                },
                line.number,
            )?,
            Statement::Else => self.switch_to_else(line.number)?,
            Statement::End => {
                if self.stack.pop().is_none() {
                    return Err(ParseError::UnmatchedEnd { line: line.number });
                }
            }
            Statement::Step(script) => {
                self.append(Draft::Leaf(Node::step(script)));
            }
            Statement::Msg(template) => {
                self.append(Draft::Leaf(Node::msg(template)));
            }
            Statement::Assign { name, value } => {
                self.append(Draft::Leaf(Node::assign(name, value)));
            }
            Statement::Exit => {
                self.append(Draft::Leaf(Node::Exit));
            }
        }
        Ok(())
    }

    /// Attach a block node and make it the innermost open block
    fn open(&mut self, draft: Draft, line: usize) -> Result<()> {
        if self.stack.len() >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                line,
                limit: MAX_NESTING_DEPTH,
            });
        }
        let id = self.append(draft);
        self.stack.push(OpenBlock {
            id,
            branch: Branch::Body,
            line,
        });
        Ok(())
    }

    /// Store a node in the arena and attach it to the innermost open block
    fn append(&mut self, draft: Draft) -> NodeId {
        let id = self.arena.len();
        self.arena.push(draft);

        let Some(open) = self.stack.last().copied() else {
            self.roots.push(id);
            return id;
        };
        match (&mut self.arena[open.id], open.branch) {
            (Draft::Pipeline { body, .. }, _) | (Draft::If { body, .. }, Branch::Body) => {
                body.push(id)
            }
            (Draft::If { else_body, .. }, Branch::Else) => {
                else_body.get_or_insert_with(Vec::new).push(id)
            }
            (Draft::Leaf(_), _) => unreachable!("leaf nodes are never opened as blocks"),
        }
        id
    }

    /// `ELSE:` closes the body of the innermost open IF and opens its else branch
    fn switch_to_else(&mut self, line: usize) -> Result<()> {
        let Some(open) = self.stack.last_mut() else {
            return Err(ParseError::ElseWithoutIf { line });
        };
        match &mut self.arena[open.id] {
            Draft::If { else_body, .. } if open.branch == Branch::Body && else_body.is_none() => {
                *else_body = Some(Vec::new());
                open.branch = Branch::Else;
                open.line = line;
                Ok(())
            }
            _ => Err(ParseError::ElseWithoutIf { line }),
        }
    }

    fn finish(self) -> Result<Vec<Node>> {
        if let Some(open) = self.stack.last() {
            let block = match (&self.arena[open.id], open.branch) {
                (Draft::Pipeline { .. }, _) => "PIPELINE",
                (_, Branch::Else) => "ELSE",
                _ => "IF",
            };
            return Err(ParseError::UnclosedBlock {
                line: open.line,
                block,
            });
        }

        let mut slots: Vec<Option<Draft>> = self.arena.into_iter().map(Some).collect();
        Ok(self
            .roots
            .iter()
            .map(|&id| assemble(&mut slots, id))
            .collect())
    }
}

/// Move a draft and its descendants out of the arena into an owned node
fn assemble(slots: &mut [Option<Draft>], id: NodeId) -> Node {
    let Some(draft) = slots[id].take() else {
        unreachable!("arena node {id} attached to more than one block");
    };
    let mut children = |ids: Vec<NodeId>| -> Vec<Node> {
        ids.into_iter().map(|child| assemble(slots, child)).collect()
    };

    match draft {
        Draft::Leaf(node) => node,
        Draft::Pipeline { mut header, body } => {
            header.body = children(body);
            Node::Pipeline(header)
        }
        Draft::If {
            condition,
            body,
            else_body,
        } => {
            let body = children(body);
            let else_branch = else_body.map(|ids| ElseBranch {
                body: children(ids),
            });
            Node::If(IfBlock {
                condition,
                body,
                else_branch,
            })
        }
    }
}

/// Pipeline file parser
pub struct PipelineParser;

impl PipelineParser {
    /// Parse pipeline source text
    pub fn parse(source: &str) -> Result<Program> {
        Self::parse_lines(&Tokenizer::tokenize(source))
    }

    /// Parse already tokenized lines
    pub fn parse_lines(lines: &[SourceLine]) -> Result<Program> {
        let mut builder = BlockBuilder::default();
        for line in lines {
            let statement = Statement::classify(line)?;
            builder.apply(line, statement)?;
        }

        let top_level = builder.finish()?;
        let program = Program::from_top_level(top_level)?;
        tracing::debug!(
            "Parsed pipeline {:?} ({} lines, {} seeded variables)",
            program.root.name,
            lines.len(),
            program.variables.len()
        );
        Ok(program)
    }
}
