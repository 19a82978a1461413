//! WRCI SDK
//!
//! High-level API for loading configuration, parsing pipeline files and
//! running them against a container runtime.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;

// Re-export main types
pub use builder::PipelineEngineBuilder;
pub use config::EngineConfig;
pub use engine::PipelineEngine;
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use wrci_core::Program;
pub use wrci_runtime::{
    ContainerAdapter, DockerAdapter, MockAdapter, MountSpec, RunOutcome, RunReport, StepRecord,
};
