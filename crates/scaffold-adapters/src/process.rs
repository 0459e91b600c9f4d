//! External process adapters.

use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use tracing::debug;

use scaffold_core::{
    application::{
        ApplicationError,
        ports::{CommandLine, CommandOutput, CommandRunner},
    },
    error::ScaffoldResult,
};

/// Runs programs with `std::process::Command`, capturing stdout and stderr.
///
/// A non-zero exit is an error whose reason carries the trimmed stderr, or
/// the exit status when stderr is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &CommandLine) -> ScaffoldResult<CommandOutput> {
        debug!(%command, cwd = ?command.cwd, "spawning");

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &command.cwd {
            process.current_dir(cwd);
        }

        let output = process.output().map_err(|e| ApplicationError::CommandFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let reason = match stderr.trim() {
                "" => output.status.to_string(),
                text => text.to_string(),
            };
            return Err(ApplicationError::CommandFailed {
                command: command.to_string(),
                reason,
            }
            .into());
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

type Responder = dyn Fn(&CommandLine) -> ScaffoldResult<CommandOutput> + Send + Sync;

/// Records every command and answers from a closure. Used by dry runs
/// and tests; never spawns anything.
#[derive(Clone)]
pub struct RecordingCommandRunner {
    calls: Arc<Mutex<Vec<CommandLine>>>,
    respond: Arc<Responder>,
}

impl std::fmt::Debug for RecordingCommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingCommandRunner")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl Default for RecordingCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCommandRunner {
    /// Every command succeeds with empty output.
    pub fn new() -> Self {
        Self::responding(|_| Ok(CommandOutput::default()))
    }

    pub fn responding<F>(respond: F) -> Self
    where
        F: Fn(&CommandLine) -> ScaffoldResult<CommandOutput> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            respond: Arc::new(respond),
        }
    }

    /// Commands seen so far, in order.
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run(&self, command: &CommandLine) -> ScaffoldResult<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }
        (self.respond)(command)
    }
}
