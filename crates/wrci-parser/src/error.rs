//! Parser error types

use thiserror::Error;
use wrci_core::CoreError;

/// Parser error
///
/// Every variant is a syntax error: parsing stops at the first one and
/// nothing is executed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line matches none of the statement forms
    #[error("line {line}: unrecognized syntax: {content}")]
    UnrecognizedSyntax { line: usize, content: String },

    /// END with no open block
    #[error("line {line}: END without matching block")]
    UnmatchedEnd { line: usize },

    /// ELSE that does not directly continue an open IF
    #[error("line {line}: ELSE without a preceding IF block")]
    ElseWithoutIf { line: usize },

    /// Block still open at end of input
    #[error("line {line}: {block} block is never closed with END")]
    UnclosedBlock { line: usize, block: &'static str },

    /// PIPELINE parameter other than helper_image, start_command, name
    #[error("line {line}: unknown PIPELINE parameter '{name}'")]
    UnknownParameter { line: usize, name: String },

    /// Same PIPELINE parameter given twice
    #[error("line {line}: PIPELINE parameter '{name}' given more than once")]
    DuplicateParameter { line: usize, name: String },

    /// Text between PIPELINE parameters that is not a separator
    #[error("line {line}: malformed PIPELINE parameters: {content}")]
    InvalidParameters { line: usize, content: String },

    /// More blocks open at once than the parser accepts
    #[error("line {line}: blocks nested deeper than {limit} levels")]
    NestingTooDeep { line: usize, limit: usize },

    /// Top level is not exactly one PIPELINE
    #[error("{0}")]
    InvalidProgram(#[from] CoreError),
}

impl ParseError {
    /// Source line the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnrecognizedSyntax { line, .. }
            | ParseError::UnmatchedEnd { line }
            | ParseError::ElseWithoutIf { line }
            | ParseError::UnclosedBlock { line, .. }
            | ParseError::UnknownParameter { line, .. }
            | ParseError::DuplicateParameter { line, .. }
            | ParseError::InvalidParameters { line, .. }
            | ParseError::NestingTooDeep { line, .. } => Some(*line),
            ParseError::InvalidProgram(_) => None,
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_syntax_message() {
        let err = ParseError::UnrecognizedSyntax {
            line: 4,
            content: "RUN build.sh".to_string(),
        };
        assert_eq!(err.to_string(), "line 4: unrecognized syntax: RUN build.sh");
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_nesting_error_message() {
        let err = ParseError::NestingTooDeep { line: 300, limit: 256 };
        assert_eq!(err.to_string(), "line 300: blocks nested deeper than 256 levels");
        assert_eq!(err.line(), Some(300));
    }

    #[test]
    fn test_program_error_conversion() {
        let err: ParseError = CoreError::InvalidProgram("empty".to_string()).into();
        assert_eq!(err.to_string(), "Invalid program: empty");
        assert_eq!(err.line(), None);
    }
}
