//! Bind mount specifications (`host_path:container_path`)

use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A host directory bind-mounted into every helper container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MountSpec {
    pub host: PathBuf,
    pub container: String,
}

impl MountSpec {
    pub fn new(host: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }

    /// Resolve a relative host path against `base`
    pub fn resolve_against(&self, base: &Path) -> Self {
        if self.host.is_absolute() {
            return self.clone();
        }
        Self {
            host: base.join(&self.host),
            container: self.container.clone(),
        }
    }

    /// Resolve a relative host path against the current working directory
    pub fn resolve(&self) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(self.resolve_against(&cwd))
    }
}

impl FromStr for MountSpec {
    type Err = RuntimeError;

    /// Split at the first `:`; both halves must be non-empty
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((host, container)) if !host.is_empty() && !container.is_empty() => {
                Ok(Self::new(host, container))
            }
            _ => Err(RuntimeError::InvalidMount(s.to_string())),
        }
    }
}

impl TryFrom<String> for MountSpec {
    type Error = RuntimeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MountSpec> for String {
    fn from(spec: MountSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for MountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host.display(), self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mount() {
        let spec: MountSpec = "./scripts:/pipeline".parse().unwrap();
        assert_eq!(spec.host, PathBuf::from("./scripts"));
        assert_eq!(spec.container, "/pipeline");
    }

    #[test]
    fn test_parse_splits_at_first_colon() {
        let spec: MountSpec = "/data:/mnt/data:ro".parse().unwrap();
        assert_eq!(spec.host, PathBuf::from("/data"));
        assert_eq!(spec.container, "/mnt/data:ro");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["/only/host", ":/pipeline", "/host:", ""] {
            assert!(
                matches!(bad.parse::<MountSpec>(), Err(RuntimeError::InvalidMount(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_relative_host() {
        let spec = MountSpec::new("scripts", "/pipeline");
        let resolved = spec.resolve_against(Path::new("/work/repo"));
        assert_eq!(resolved.host, PathBuf::from("/work/repo/scripts"));
        assert_eq!(resolved.container, "/pipeline");
    }

    #[test]
    fn test_resolve_keeps_absolute_host() {
        let spec = MountSpec::new("/srv/scripts", "/pipeline");
        assert_eq!(spec.resolve_against(Path::new("/work")), spec);
    }

    #[test]
    fn test_serde_as_string() {
        let spec = MountSpec::new("/srv/scripts", "/pipeline");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json, serde_json::json!("/srv/scripts:/pipeline"));

        let back: MountSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
        assert!(serde_json::from_value::<MountSpec>(serde_json::json!("nope")).is_err());
    }
}
