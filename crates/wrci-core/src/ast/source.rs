//! Rendering of the AST back to pipeline source text
//!
//! The output parses back to an equal AST. Nested blocks are indented by four
//! spaces; indentation carries no meaning for the parser.

use crate::ast::{IfBlock, Node, Pipeline};
use std::fmt::{self, Write};

const INDENT: &str = "    ";

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pipeline(f, self, 0)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}

fn write_pipeline<W: Write>(out: &mut W, pipeline: &Pipeline, depth: usize) -> fmt::Result {
    let params = pipeline
        .parameters()
        .into_iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, value))
        .collect::<Vec<_>>()
        .join(", ");
    line(out, depth, &format!("PIPELINE({})", params))?;
    write_body(out, &pipeline.body, depth + 1)?;
    line(out, depth, "END")
}

fn write_if<W: Write>(out: &mut W, block: &IfBlock, depth: usize) -> fmt::Result {
    let cond = &block.condition;
    line(
        out,
        depth,
        &format!("IF ${} {} \"{}\":", cond.variable, cond.operator, cond.literal),
    )?;
    write_body(out, &block.body, depth + 1)?;
    if let Some(else_branch) = &block.else_branch {
        line(out, depth, "ELSE:")?;
        write_body(out, &else_branch.body, depth + 1)?;
    }
    line(out, depth, "END")
}

fn write_body<W: Write>(out: &mut W, nodes: &[Node], depth: usize) -> fmt::Result {
    for node in nodes {
        write_node(out, node, depth)?;
    }
    Ok(())
}

fn write_node<W: Write>(out: &mut W, node: &Node, depth: usize) -> fmt::Result {
    match node {
        Node::Pipeline(pipeline) => write_pipeline(out, pipeline, depth),
        Node::If(block) => write_if(out, block, depth),
        Node::Step(step) => line(out, depth, &format!("STEP {}", step.script)),
        Node::Msg(msg) => line(out, depth, &format!("MSG(\"{}\")", msg.template)),
        Node::Assign(assign) => line(
            out,
            depth,
            &format!("${} = \"{}\"", assign.name, assign.value),
        ),
        Node::Exit => line(out, depth, "EXIT"),
    }
}

fn line<W: Write>(out: &mut W, depth: usize, text: &str) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    out.write_str(text)?;
    out.write_char('\n')
}
