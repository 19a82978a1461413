//! Execution context
//!
//! Mutable state shared by every statement of one run: the flat variable
//! namespace, the container registry and what has been observed so far.

use crate::adapter::{ContainerHandle, ExecOutput};
use crate::registry::ContainerRegistry;
use crate::result::{RunOutcome, RunReport, StepRecord};
use std::time::Instant;
use wrci_core::types::LAST_RC;
use wrci_core::Variables;

/// State of a single run
#[derive(Debug)]
pub struct ExecutionContext {
    /// Flat variable namespace shared by all pipelines
    pub variables: Variables,

    /// Containers started by this run, keyed by pipeline name
    pub registry: ContainerRegistry,

    /// Exit code of the most recent STEP
    pub last_rc: i32,

    /// Interpolated MSG output
    pub messages: Vec<String>,

    pub steps: Vec<StepRecord>,

    /// Every container created, in creation order
    containers: Vec<String>,

    started: Instant,
}

impl ExecutionContext {
    /// Create a context from seeded variables
    ///
    /// `LAST_RC` starts at "0" unless the seed already binds it.
    pub fn new(mut variables: Variables) -> Self {
        if !variables.contains(LAST_RC) {
            variables.set(LAST_RC, "0");
        }
        Self {
            variables,
            registry: ContainerRegistry::new(),
            last_rc: 0,
            messages: Vec::new(),
            steps: Vec::new(),
            containers: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Remember a freshly created container
    pub fn track_container(&mut self, name: &str, handle: ContainerHandle) {
        self.containers.push(handle.id.clone());
        self.registry.register(name, handle);
    }

    /// Record a finished STEP and update `LAST_RC`
    pub fn record_step(
        &mut self,
        pipeline: Option<&str>,
        command: &str,
        container: &ContainerHandle,
        output: ExecOutput,
    ) {
        self.last_rc = output.exit_code;
        self.variables.set(LAST_RC, output.exit_code.to_string());
        self.steps.push(StepRecord {
            pipeline: pipeline.map(str::to_string),
            command: command.to_string(),
            container: container.id.clone(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    /// Finish the run
    pub fn into_report(self, outcome: RunOutcome) -> RunReport {
        RunReport {
            outcome,
            variables: self.variables,
            last_rc: self.last_rc,
            messages: self.messages,
            steps: self.steps,
            containers: self.containers,
            duration_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}
