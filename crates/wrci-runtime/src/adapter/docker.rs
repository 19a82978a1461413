//! Docker CLI adapter
//!
//! Drives containers through the `docker` command line (or any CLI with the
//! same `run`/`exec`/`kill` surface, such as `podman`).

use super::{ContainerAdapter, ContainerHandle, CreateRequest, ExecOutput};
use crate::error::{Result, RuntimeError};
use std::process::{Command, Output};

/// Default container CLI binary
pub const DEFAULT_CONTAINER_CLI: &str = "docker";

/// Default shell used for start commands and steps
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Container adapter backed by the docker CLI
#[derive(Debug, Clone)]
pub struct DockerAdapter {
    program: String,
    shell: String,
}

impl DockerAdapter {
    /// Create an adapter using `docker` and `/bin/sh`
    pub fn new() -> Self {
        Self {
            program: DEFAULT_CONTAINER_CLI.to_string(),
            shell: DEFAULT_SHELL.to_string(),
        }
    }

    /// Use a different container CLI binary
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a different shell inside containers
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Arguments for `docker run`
    pub fn run_args(&self, request: &CreateRequest) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "-d".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            request.name.clone(),
        ];
        for mount in &request.mounts {
            args.push("-v".to_string());
            args.push(mount.to_string());
        }
        args.push(request.image.clone());
        if let Some(command) = &request.start_command {
            args.push(self.shell.clone());
            args.push("-c".to_string());
            args.push(command.clone());
        }
        args
    }

    /// Arguments for `docker exec`
    pub fn exec_args(
        &self,
        handle: &ContainerHandle,
        command_path: &str,
        env: &[(String, String)],
    ) -> Vec<String> {
        let mut args = vec!["exec".to_string()];
        for (key, value) in env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push(handle.id.clone());
        args.push(self.shell.clone());
        args.push("-c".to_string());
        args.push(command_path.to_string());
        args
    }

    /// Arguments for `docker kill`
    pub fn kill_args(&self, handle: &ContainerHandle) -> Vec<String> {
        vec!["kill".to_string(), handle.id.clone()]
    }

    fn run(&self, args: &[String], operation: &'static str, target: &str) -> Result<Output> {
        tracing::debug!("Running command: {} {}", self.program, args.join(" "));
        Command::new(&self.program).args(args).output().map_err(|e| {
            RuntimeError::adapter(
                operation,
                target,
                format!("failed to run {}: {}", self.program, e),
            )
        })
    }
}

impl Default for DockerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerAdapter for DockerAdapter {
    fn create(&self, request: &CreateRequest) -> Result<ContainerHandle> {
        let output = self.run(&self.run_args(request), "create", &request.name)?;
        if !output.status.success() {
            return Err(RuntimeError::adapter(
                "create",
                &request.name,
                error_text(&output),
            ));
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(ContainerHandle::new(id, &request.name))
    }

    fn exec(
        &self,
        handle: &ContainerHandle,
        command_path: &str,
        env: &[(String, String)],
    ) -> Result<ExecOutput> {
        let output = self.run(
            &self.exec_args(handle, command_path, env),
            "exec",
            &handle.name,
        )?;

        // Killed by a signal: no exit code to report
        let exit_code = output.status.code().unwrap_or(-1);
        Ok(ExecOutput::new(exit_code)
            .with_stdout(String::from_utf8_lossy(&output.stdout))
            .with_stderr(String::from_utf8_lossy(&output.stderr)))
    }

    fn destroy(&self, handle: &ContainerHandle) -> Result<()> {
        let output = self.run(&self.kill_args(handle), "destroy", &handle.name)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(RuntimeError::adapter(
                "destroy",
                &handle.name,
                error_text(&output),
            ))
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Prefer stderr, fall back to stdout
fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}
