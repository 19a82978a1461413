//! Variable environment
//!
//! A single mutable store of name → text bindings shared by every block of a
//! pipeline run. Nested pipelines do not get their own scope: an assignment
//! made inside a child pipeline is still visible to the parent once control
//! returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name under which the exit code of the most recent step is published
pub const LAST_RC: &str = "LAST_RC";

/// Ordered mapping of variable name to text value
///
/// Iteration is sorted by name so environment bindings handed to a container
/// are reproducible from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable; `None` means the name was never bound
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Bind `name` to `value`, returning the previous value if any
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Snapshot of every binding as owned `(name, value)` pairs
    pub fn bindings(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut vars = Variables::new();
        assert_eq!(vars.set("STAGE", "build"), None);
        assert_eq!(vars.set("STAGE", "deploy"), Some("build".to_string()));
        assert_eq!(vars.get("STAGE"), Some("deploy"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_missing_is_none() {
        let vars = Variables::new();
        assert_eq!(vars.get("NOPE"), None);
        assert!(!vars.contains("NOPE"));
        assert!(vars.is_empty());
    }

    #[test]
    fn test_bindings_sorted_by_name() {
        let vars: Variables = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let names: Vec<String> = vars.bindings().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let vars: Variables = [("name", "build")].into_iter().collect();
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "build" }));
    }
}
