//! Line grammar
//!
//! Each source line is exactly one statement. Forms are tried in a fixed
//! order and each pattern must match the whole line:
//!
//! ```text
//! PIPELINE(helper_image="IMG", start_command="CMD", name="NAME")
//! STEP <path>
//! IF $VAR == "LITERAL":          (or !=)
//! ELSE:
//! MSG("text with $VAR placeholders")
//! $VAR = "literal"
//! END
//! EXIT
//! ```

use crate::error::{ParseError, Result};
use crate::tokenizer::SourceLine;
use regex::Regex;
use std::sync::LazyLock;
use wrci_core::ast::{Condition, Operator, Pipeline};

static PIPELINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PIPELINE\s*\((.*)\)$").unwrap());

static PARAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)\s*=\s*"([^"]*)""#).unwrap());

static STEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^STEP\s+(\S.*)$").unwrap());

static IF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^IF\s+\$(\w+)\s*(==|!=)\s*"(.*)"\s*:$"#).unwrap());

static ELSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ELSE\s*:$").unwrap());

static MSG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^MSG\s*\(\s*"(.*)"\s*\)$"#).unwrap());

static ASSIGN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\$(\w+)\s*=\s*"(.*)"$"#).unwrap());

static END_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^END$").unwrap());

static EXIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^EXIT$").unwrap());

/// A classified source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `PIPELINE(...)`; the pipeline carries its parameters and an empty body
    PipelineOpen(Pipeline),
    Step(String),
    IfOpen(Condition),
    Else,
    Msg(String),
    Assign { name: String, value: String },
    End,
    Exit,
}

impl Statement {
    /// Classify one line
    pub fn classify(line: &SourceLine) -> Result<Self> {
        let text = line.text.as_str();

        if let Some(caps) = PIPELINE_PATTERN.captures(text) {
            let header = parse_parameters(line.number, &caps[1])?;
            return Ok(Statement::PipelineOpen(header));
        }

        if let Some(caps) = STEP_PATTERN.captures(text) {
            return Ok(Statement::Step(caps[1].to_string()));
        }

        if let Some(caps) = IF_PATTERN.captures(text) {
            let operator: Operator =
                caps[2]
                    .parse()
                    .map_err(|_| ParseError::UnrecognizedSyntax {
                        line: line.number,
                        content: line.text.clone(),
                    })?;
            return Ok(Statement::IfOpen(Condition::new(
                &caps[1], operator, &caps[3],
            )));
        }

        if ELSE_PATTERN.is_match(text) {
            return Ok(Statement::Else);
        }

        if let Some(caps) = MSG_PATTERN.captures(text) {
            return Ok(Statement::Msg(caps[1].to_string()));
        }

        if let Some(caps) = ASSIGN_PATTERN.captures(text) {
            return Ok(Statement::Assign {
                name: caps[1].to_string(),
                value: caps[2].to_string(),
            });
        }

        if END_PATTERN.is_match(text) {
            return Ok(Statement::End);
        }

        if EXIT_PATTERN.is_match(text) {
            return Ok(Statement::Exit);
        }

        Err(ParseError::UnrecognizedSyntax {
            line: line.number,
            content: line.text.clone(),
        })
    }
}

/// Parse the inside of `PIPELINE(...)` into a header pipeline
///
/// Empty values are treated as absent.
fn parse_parameters(line: usize, params: &str) -> Result<Pipeline> {
    let mut header = Pipeline::new();
    let mut cursor = 0;

    for caps in PARAM_PATTERN.captures_iter(params) {
        let (Some(whole), Some(key), Some(value)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        check_separator(line, params, &params[cursor..whole.start()])?;
        cursor = whole.end();

        let slot = match key.as_str() {
            "helper_image" => &mut header.helper_image,
            "start_command" => &mut header.start_command,
            "name" => &mut header.name,
            other => {
                return Err(ParseError::UnknownParameter {
                    line,
                    name: other.to_string(),
                })
            }
        };
        if slot.is_some() {
            return Err(ParseError::DuplicateParameter {
                line,
                name: key.as_str().to_string(),
            });
        }
        *slot = Some(value.as_str().to_string()).filter(|v| !v.is_empty());
    }

    check_separator(line, params, &params[cursor..])?;
    Ok(header)
}

fn check_separator(line: usize, params: &str, between: &str) -> Result<()> {
    if between.chars().all(|c| c == ',' || c.is_whitespace()) {
        Ok(())
    } else {
        Err(ParseError::InvalidParameters {
            line,
            content: params.to_string(),
        })
    }
}
