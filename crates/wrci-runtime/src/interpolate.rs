//! `$name` substitution in message templates

use regex::{Captures, Regex};
use std::sync::LazyLock;
use wrci_core::Variables;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\w+)").unwrap());

/// Replace every `$name` with the variable's value
///
/// Names are matched greedily (`$AB` never means `$A` followed by `B`).
/// Placeholders without a binding are left as written.
pub fn interpolate(template: &str, variables: &Variables) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
