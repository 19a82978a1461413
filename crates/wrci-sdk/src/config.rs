//! Configuration types for PipelineEngine

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wrci_runtime::adapter::docker::{DEFAULT_CONTAINER_CLI, DEFAULT_SHELL};
use wrci_runtime::{ExecutorOptions, MountSpec, DEFAULT_MOUNT_ROOT};

/// Prefix of environment variables read by `EngineConfig::load`
pub const ENV_PREFIX: &str = "WRCI";

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bind mounts passed to every helper container
    pub mounts: Vec<MountSpec>,

    /// Directory inside containers holding the pipeline scripts
    pub mount_root: String,

    /// Container CLI binary (`docker`, `podman`, ...)
    pub container_cli: String,

    /// Shell used for start commands and steps
    pub shell: String,
}

impl EngineConfig {
    /// Create a new engine configuration with defaults
    pub fn new() -> Self {
        Self {
            mounts: Vec::new(),
            mount_root: DEFAULT_MOUNT_ROOT.to_string(),
            container_cli: DEFAULT_CONTAINER_CLI.to_string(),
            shell: DEFAULT_SHELL.to_string(),
        }
    }

    /// Load configuration from an optional file, `.env` and `WRCI_*` variables
    ///
    /// Later sources win. `WRCI_MOUNTS` takes a comma separated list of
    /// `host:container` specs.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = file {
            tracing::debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("mounts"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Add a bind mount
    pub fn with_mount(mut self, mount: MountSpec) -> Self {
        self.mounts.push(mount);
        self
    }

    /// Set mount root
    pub fn with_mount_root(mut self, root: impl Into<String>) -> Self {
        self.mount_root = root.into();
        self
    }

    /// Set container CLI binary
    pub fn with_container_cli(mut self, cli: impl Into<String>) -> Self {
        self.container_cli = cli.into();
        self
    }

    /// Set shell
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Make every relative mount host path absolute against `base`
    pub fn resolve_mounts(mut self, base: &Path) -> Self {
        self.mounts = self
            .mounts
            .iter()
            .map(|mount| mount.resolve_against(base))
            .collect();
        self
    }

    /// Executor options derived from this configuration
    pub fn executor_options(&self) -> ExecutorOptions {
        ExecutorOptions::default()
            .with_mount_root(self.mount_root.clone())
            .with_mounts(self.mounts.clone())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
