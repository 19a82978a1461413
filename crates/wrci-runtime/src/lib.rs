//! WRCI Runtime - Execution engine for parsed pipelines
//!
//! This crate provides the tree-walking executor and everything it drives:
//! - The `ContainerAdapter` seam and its Docker and mock implementations
//! - The per-run container registry
//! - Message interpolation
//! - The run report

pub mod adapter;
pub mod context;
pub mod error;
pub mod executor;
pub mod interpolate;
pub mod registry;
pub mod result;

// Re-export main types
pub use adapter::{
    AdapterCall, ContainerAdapter, ContainerHandle, CreateRequest, DockerAdapter, ExecOutput,
    MockAdapter, MountSpec,
};
pub use context::ExecutionContext;
pub use error::{Result, RuntimeError};
pub use executor::{Executor, ExecutorOptions, DEFAULT_MOUNT_ROOT};
pub use registry::ContainerRegistry;
pub use result::{RunOutcome, RunReport, StepRecord};
