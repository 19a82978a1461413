//! Builder pattern for PipelineEngine

use crate::config::EngineConfig;
use crate::engine::PipelineEngine;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;
use wrci_runtime::{ContainerAdapter, DockerAdapter, MountSpec};

/// Builder for PipelineEngine
///
/// # Example
///
/// ```rust,ignore
/// use wrci_sdk::PipelineEngineBuilder;
///
/// // Docker with the scripts directory mounted
/// let engine = PipelineEngineBuilder::new()
///     .add_mount("./scripts:/pipeline".parse()?)
///     .build()?;
///
/// // Any other adapter (tests, remote runtimes)
/// let engine = PipelineEngineBuilder::new()
///     .with_adapter(Arc::new(MockAdapter::new()))
///     .build()?;
/// ```
pub struct PipelineEngineBuilder {
    config: EngineConfig,
    adapter: Option<Arc<dyn ContainerAdapter>>,
}

impl PipelineEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            adapter: None,
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a bind mount
    pub fn add_mount(mut self, mount: MountSpec) -> Self {
        self.config.mounts.push(mount);
        self
    }

    pub fn with_mount_root(mut self, root: impl Into<String>) -> Self {
        self.config.mount_root = root.into();
        self
    }

    pub fn with_container_cli(mut self, cli: impl Into<String>) -> Self {
        self.config.container_cli = cli.into();
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.config.shell = shell.into();
        self
    }

    /// Use a custom container adapter instead of the docker CLI
    pub fn with_adapter(mut self, adapter: Arc<dyn ContainerAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Build the engine
    ///
    /// Relative mount host paths are resolved against the current directory.
    pub fn build(self) -> Result<PipelineEngine> {
        let cwd = std::env::current_dir()?;
        self.build_in(&cwd)
    }

    /// Build the engine, resolving relative mount host paths against `base`
    pub fn build_in(self, base: &Path) -> Result<PipelineEngine> {
        let config = self.config.resolve_mounts(base);
        let adapter = match self.adapter {
            Some(adapter) => adapter,
            None => Arc::new(
                DockerAdapter::new()
                    .with_program(config.container_cli.clone())
                    .with_shell(config.shell.clone()),
            ),
        };
        tracing::debug!(
            "Building pipeline engine with adapter {} ({} mounts)",
            adapter.name(),
            config.mounts.len()
        );

        Ok(PipelineEngine::new(config, adapter))
    }
}

impl Default for PipelineEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
