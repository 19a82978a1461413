//! Comparison operators for IF conditions

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary comparison operators
///
/// Comparisons are always textual: `LAST_RC == "0"` compares the decimal
/// text of the exit code, never a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
}

impl Operator {
    /// Source symbol of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }

    /// Compare an optional variable value against a literal
    ///
    /// An absent value never equals any literal, including the empty string.
    pub fn compare(&self, actual: Option<&str>, literal: &str) -> bool {
        let equal = actual == Some(literal);
        match self {
            Operator::Eq => equal,
            Operator::Ne => !equal,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            other => Err(CoreError::InvalidOperator(other.to_string())),
        }
    }
}
