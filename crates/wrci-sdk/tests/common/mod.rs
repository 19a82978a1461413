//! Common test utilities for SDK integration tests

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wrci_sdk::{MockAdapter, PipelineEngine, PipelineEngineBuilder};

/// Engine backed by a mock adapter, plus a scratch directory for pipeline files
pub struct TestEngine {
    pub adapter: Arc<MockAdapter>,
    pub engine: PipelineEngine,
    dir: TempDir,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_adapter(MockAdapter::new())
    }

    pub fn with_adapter(adapter: MockAdapter) -> Self {
        let adapter = Arc::new(adapter);
        let dir = tempfile::tempdir().expect("create temp dir");
        let engine = PipelineEngineBuilder::new()
            .add_mount("scripts:/pipeline".parse().expect("valid mount"))
            .with_adapter(adapter.clone())
            .build_in(dir.path())
            .expect("build engine");
        Self {
            adapter,
            engine,
            dir,
        }
    }

    /// Write a pipeline file into the scratch directory
    pub fn write_pipeline(&self, name: &str, source: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, source.trim_start()).expect("write pipeline file");
        path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
