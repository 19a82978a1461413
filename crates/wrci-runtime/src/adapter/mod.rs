//! Container adapter interface and types
//!
//! The executor never talks to a container runtime directly; every create,
//! exec and destroy goes through a `ContainerAdapter`. All calls block until
//! the runtime answers.

pub mod docker;
pub mod mock;
pub mod mount;

pub use docker::DockerAdapter;
pub use mock::{AdapterCall, MockAdapter};
pub use mount::MountSpec;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to start a helper container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Pipeline name, used as the container name
    pub name: String,

    /// Image to start
    pub image: String,

    /// Optional command the container runs instead of its default
    pub start_command: Option<String>,

    /// Bind mounts, host paths already absolute
    pub mounts: Vec<MountSpec>,
}

impl CreateRequest {
    /// Create a new request without start command or mounts
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            start_command: None,
            mounts: Vec::new(),
        }
    }

    /// Set start command
    pub fn with_start_command(mut self, command: Option<String>) -> Self {
        self.start_command = command;
        self
    }

    /// Add bind mounts
    pub fn with_mounts(mut self, mounts: Vec<MountSpec>) -> Self {
        self.mounts.extend(mounts);
        self
    }
}

/// Opaque reference to a running container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerHandle {
    /// Runtime identifier (container id)
    pub id: String,

    /// Pipeline name the container was started for
    pub name: String,
}

impl ContainerHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Captured result of running a command in a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Synchronous container runtime interface
pub trait ContainerAdapter: Send + Sync {
    /// Start a container and return its handle
    fn create(&self, request: &CreateRequest) -> Result<ContainerHandle>;

    /// Run `command_path` inside the container with the given environment
    ///
    /// A non-zero exit code is a normal result, not an error. Errors mean the
    /// command could not be run at all.
    fn exec(
        &self,
        handle: &ContainerHandle,
        command_path: &str,
        env: &[(String, String)],
    ) -> Result<ExecOutput>;

    /// Stop a container
    fn destroy(&self, handle: &ContainerHandle) -> Result<()>;

    /// Get the name of this adapter
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_builder() {
        let request = CreateRequest::new("build", "rust:1.80")
            .with_start_command(Some("sleep infinity".to_string()))
            .with_mounts(vec![MountSpec::new("/src", "/pipeline")]);

        assert_eq!(request.name, "build");
        assert_eq!(request.start_command.as_deref(), Some("sleep infinity"));
        assert_eq!(request.mounts.len(), 1);
    }

    #[test]
    fn test_exec_output_success() {
        assert!(ExecOutput::new(0).success());
        assert!(!ExecOutput::new(3).with_stderr("boom").success());
    }

    #[test]
    fn test_handle_displays_id() {
        let handle = ContainerHandle::new("4f2a9c", "build");
        assert_eq!(handle.to_string(), "4f2a9c");
    }
}
