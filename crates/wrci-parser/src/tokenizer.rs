//! Line tokenizer
//!
//! The language is line-oriented, so a token is a whole trimmed source line.

/// Comment marker; only recognised at the start of a line
const COMMENT: char = '#';

/// A logical source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the source text
    pub number: usize,
    /// Trimmed line content, never empty
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

pub struct Tokenizer;

impl Tokenizer {
    /// Split source text into trimmed, non-blank, non-comment lines
    ///
    /// Never fails; any text produces some (possibly empty) sequence.
    pub fn tokenize(source: &str) -> Vec<SourceLine> {
        source
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let text = raw.trim();
                if text.is_empty() || text.starts_with(COMMENT) {
                    None
                } else {
                    Some(SourceLine::new(idx + 1, text))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let source = "\n# header\nPIPELINE(name=\"p\")\n\n   # indented comment\n  STEP a.sh  \nEND\n";
        let lines = Tokenizer::tokenize(source);
        assert_eq!(
            lines,
            vec![
                SourceLine::new(3, "PIPELINE(name=\"p\")"),
                SourceLine::new(6, "STEP a.sh"),
                SourceLine::new(7, "END"),
            ]
        );
    }

    #[test]
    fn test_trailing_hash_is_kept() {
        let lines = Tokenizer::tokenize("MSG(\"build #42\")");
        assert_eq!(lines[0].text, "MSG(\"build #42\")");
    }

    #[test]
    fn test_crlf_line_endings() {
        let lines = Tokenizer::tokenize("EXIT\r\nEND\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "EXIT");
        assert_eq!(lines[1].number, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(Tokenizer::tokenize("").is_empty());
        assert!(Tokenizer::tokenize("   \n\t\n# only comments").is_empty());
    }
}
