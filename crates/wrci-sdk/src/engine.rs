//! PipelineEngine - parse and run pipeline files

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use std::path::Path;
use std::sync::Arc;
use wrci_core::Program;
use wrci_parser::PipelineParser;
use wrci_runtime::{ContainerAdapter, Executor, RunReport};

/// Parses pipeline sources and executes them through a container adapter
pub struct PipelineEngine {
    config: EngineConfig,
    executor: Executor,
    adapter_name: String,
}

impl PipelineEngine {
    /// Create an engine from a resolved configuration and an adapter
    pub fn new(config: EngineConfig, adapter: Arc<dyn ContainerAdapter>) -> Self {
        let adapter_name = adapter.name().to_string();
        let executor = Executor::new(adapter).with_options(config.executor_options());
        Self {
            config,
            executor,
            adapter_name,
        }
    }

    /// Parse pipeline source text
    pub fn parse(&self, source: &str) -> Result<Program> {
        Ok(PipelineParser::parse(source)?)
    }

    /// Read and parse a pipeline file
    pub fn load_file(&self, path: &Path) -> Result<Program> {
        let source = std::fs::read_to_string(path).map_err(|source| SdkError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!("Loaded pipeline file {}", path.display());
        self.parse(&source)
    }

    /// Execute an already parsed program
    pub fn run(&self, program: &Program) -> Result<RunReport> {
        let report = self.executor.execute(program)?;
        tracing::info!(
            "Pipeline finished ({:?}) after {} steps, last exit code {}",
            report.outcome,
            report.steps.len(),
            report.last_rc
        );
        Ok(report)
    }

    /// Parse and execute pipeline source text
    pub fn run_source(&self, source: &str) -> Result<RunReport> {
        let program = self.parse(source)?;
        self.run(&program)
    }

    /// Read, parse and execute a pipeline file
    pub fn run_file(&self, path: &Path) -> Result<RunReport> {
        let program = self.load_file(path)?;
        self.run(&program)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the adapter containers are driven through
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }
}
