use std::fmt;

use serde::Serialize;

/// Outcome of one workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub step: String,
    pub success: bool,
    pub message: String,
    pub skipped: bool,
}

impl StepResult {
    pub fn ok(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            success: true,
            message: message.into(),
            skipped: false,
        }
    }

    pub fn failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            success: false,
            message: message.into(),
            skipped: false,
        }
    }

    pub fn skipped(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            success: true,
            message: message.into(),
            skipped: true,
        }
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match (self.success, self.skipped) {
            (_, true) => "skip",
            (true, false) => "ok",
            (false, false) => "FAIL",
        };
        write!(f, "[{status}] {}: {}", self.step, self.message)
    }
}

/// Ordered results of a workflow run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    pub steps: Vec<StepResult>,
}

impl WorkflowReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: StepResult) {
        self.steps.push(result);
    }

    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.success)
    }

    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| !s.success)
    }

    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.step == name)
    }
}
