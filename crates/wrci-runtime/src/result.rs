//! Run result types

use serde::{Deserialize, Serialize};
use wrci_core::Variables;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every statement ran
    Completed,
    /// An EXIT statement stopped the run
    Exited,
}

/// One executed STEP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Pipeline the step ran in (None for nameless pipelines)
    pub pipeline: Option<String>,

    /// Command path inside the container
    pub command: String,

    /// Container id
    pub container: String,

    pub exit_code: i32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stdout: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

/// Result of executing a pipeline program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,

    /// Variables at the end of the run
    pub variables: Variables,

    /// Exit code of the last STEP (0 if none ran)
    pub last_rc: i32,

    /// Interpolated MSG output, in order
    pub messages: Vec<String>,

    pub steps: Vec<StepRecord>,

    /// Ids of the containers started during the run
    pub containers: Vec<String>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    pub fn exited_early(&self) -> bool {
        self.outcome == RunOutcome::Exited
    }

    /// Steps that returned a non-zero exit code
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|step| step.exit_code != 0)
    }
}
