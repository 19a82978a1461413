//! Mock container adapter for testing
//!
//! Records every call in order and answers from a script of exit codes keyed
//! by command path. No process is ever started.

use super::{ContainerAdapter, ContainerHandle, CreateRequest, ExecOutput, MountSpec};
use crate::error::{Result, RuntimeError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A call observed by the mock adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    Create {
        name: String,
        image: String,
        start_command: Option<String>,
        mounts: Vec<MountSpec>,
    },
    Exec {
        container: String,
        command: String,
        env: Vec<(String, String)>,
    },
    Destroy {
        container: String,
    },
}

/// In-memory container adapter
#[derive(Debug, Default)]
pub struct MockAdapter {
    calls: Mutex<Vec<AdapterCall>>,
    exit_codes: HashMap<String, i32>,
    outputs: HashMap<String, String>,
    fail_create: HashSet<String>,
    fail_exec: HashSet<String>,
    fail_destroy: HashSet<String>,
}

impl MockAdapter {
    /// Create a mock where every command exits 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the exit code for a command path
    pub fn with_exit_code(mut self, command_path: impl Into<String>, code: i32) -> Self {
        self.exit_codes.insert(command_path.into(), code);
        self
    }

    /// Script stdout for a command path
    pub fn with_stdout(mut self, command_path: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.outputs.insert(command_path.into(), stdout.into());
        self
    }

    /// Fail `create` for the named container
    pub fn fail_create(mut self, name: impl Into<String>) -> Self {
        self.fail_create.insert(name.into());
        self
    }

    /// Fail `exec` for a command path
    pub fn fail_exec(mut self, command_path: impl Into<String>) -> Self {
        self.fail_exec.insert(command_path.into());
        self
    }

    /// Fail `destroy` for the named container
    pub fn fail_destroy(mut self, name: impl Into<String>) -> Self {
        self.fail_destroy.insert(name.into());
        self
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.lock().clone()
    }

    pub fn create_count(&self) -> usize {
        self.count(|call| matches!(call, AdapterCall::Create { .. }))
    }

    pub fn exec_count(&self) -> usize {
        self.count(|call| matches!(call, AdapterCall::Exec { .. }))
    }

    pub fn destroy_count(&self) -> usize {
        self.count(|call| matches!(call, AdapterCall::Destroy { .. }))
    }

    /// Command paths passed to `exec`, in order
    pub fn executed_commands(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                AdapterCall::Exec { command, .. } => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&AdapterCall) -> bool) -> usize {
        self.lock().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: AdapterCall) {
        self.lock().push(call);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AdapterCall>> {
        // Recorded calls stay readable after a poisoning panic
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ContainerAdapter for MockAdapter {
    fn create(&self, request: &CreateRequest) -> Result<ContainerHandle> {
        self.record(AdapterCall::Create {
            name: request.name.clone(),
            image: request.image.clone(),
            start_command: request.start_command.clone(),
            mounts: request.mounts.clone(),
        });

        if self.fail_create.contains(&request.name) {
            return Err(RuntimeError::adapter(
                "create",
                &request.name,
                format!("Unable to find image '{}' locally", request.image),
            ));
        }
        Ok(ContainerHandle::new(
            format!("mock-{}-{}", request.name, self.create_count()),
            &request.name,
        ))
    }

    fn exec(
        &self,
        handle: &ContainerHandle,
        command_path: &str,
        env: &[(String, String)],
    ) -> Result<ExecOutput> {
        self.record(AdapterCall::Exec {
            container: handle.id.clone(),
            command: command_path.to_string(),
            env: env.to_vec(),
        });

        if self.fail_exec.contains(command_path) {
            return Err(RuntimeError::adapter(
                "exec",
                &handle.name,
                format!("container {} is not running", handle.id),
            ));
        }

        let code = self.exit_codes.get(command_path).copied().unwrap_or(0);
        let stdout = self.outputs.get(command_path).cloned().unwrap_or_default();
        Ok(ExecOutput::new(code).with_stdout(stdout))
    }

    fn destroy(&self, handle: &ContainerHandle) -> Result<()> {
        self.record(AdapterCall::Destroy {
            container: handle.id.clone(),
        });

        if self.fail_destroy.contains(&handle.name) {
            return Err(RuntimeError::adapter(
                "destroy",
                &handle.name,
                format!("No such container: {}", handle.id),
            ));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
