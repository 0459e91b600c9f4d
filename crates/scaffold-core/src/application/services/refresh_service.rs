//! Refresh Service - reinstall, rebuild and commit an existing package.
//!
//! Steps: `cleanup` (only with `force`), `install`, `build`, `git`. Results
//! are returned to the caller; nothing is kept between runs.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandLine, CommandRunner, Filesystem},
    },
    domain::{StepResult, WorkflowReport},
    error::ScaffoldResult,
};

/// Build artifacts removed by a forced refresh. Directories end in `/`.
pub const CLEANUP_TARGETS: [&str; 4] = [
    "node_modules/",
    "dist/",
    "pnpm-lock.yaml",
    "tsconfig.tsbuildinfo",
];

/// Closing paragraph of every refresh commit message.
const COMMIT_TRAILER: &str = " Generated with mark lib refresh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOptions {
    pub package_path: PathBuf,
    pub package_name: String,
    pub force: bool,
    pub skip_git: bool,
    pub dry_run: bool,
}

impl RefreshOptions {
    pub fn new(package_path: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            package_name: package_name.into(),
            force: false,
            skip_git: false,
            dry_run: false,
        }
    }
}

/// Outcome of one step: the result to record and whether to go on.
type Step = (StepResult, bool);

pub struct RefreshService {
    runner: Box<dyn CommandRunner>,
    filesystem: Box<dyn Filesystem>,
}

impl RefreshService {
    pub fn new(runner: Box<dyn CommandRunner>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { runner, filesystem }
    }

    /// Refresh the package at `options.package_path`.
    ///
    /// The first failing step is recorded and ends the run.
    #[instrument(skip_all, fields(package = %options.package_name, dry_run = options.dry_run))]
    pub fn run(&self, options: &RefreshOptions) -> ScaffoldResult<WorkflowReport> {
        if !self.filesystem.exists(&options.package_path) {
            return Err(ApplicationError::PackageNotFound {
                path: options.package_path.clone(),
            }
            .into());
        }

        info!(
            "Refreshing {} at {}",
            options.package_name,
            options.package_path.display()
        );

        let steps: [fn(&Self, &RefreshOptions) -> Step; 4] =
            [Self::cleanup, Self::install, Self::build, Self::git];

        let mut report = WorkflowReport::new();
        for step in steps {
            let (result, proceed) = step(self, options);
            report.push(result);
            if !proceed {
                warn!("refresh aborted");
                break;
            }
        }
        Ok(report)
    }

    fn cleanup(&self, options: &RefreshOptions) -> Step {
        if !options.force {
            return (StepResult::skipped("cleanup", "Skipped (force not set)"), true);
        }

        let present: Vec<(&str, PathBuf)> = CLEANUP_TARGETS
            .iter()
            .map(|name| (*name, options.package_path.join(name.trim_end_matches('/'))))
            .filter(|(_, path)| self.filesystem.exists(path))
            .collect();

        if present.is_empty() {
            return (StepResult::ok("cleanup", "Nothing to clean up"), true);
        }

        let listing = present
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");

        if options.dry_run {
            return (StepResult::ok("cleanup", format!("Would delete: {listing}")), true);
        }

        for (name, path) in &present {
            let removed = if name.ends_with('/') {
                self.filesystem.remove_dir_all(path)
            } else {
                self.filesystem.remove_file(path)
            };
            if let Err(e) = removed {
                return (StepResult::failed("cleanup", format!("Failed: {e}")), false);
            }
        }
        info!("Deleted: {listing}");
        (StepResult::ok("cleanup", format!("Deleted: {listing}")), true)
    }

    fn install(&self, options: &RefreshOptions) -> Step {
        self.command_step(
            "install",
            CommandLine::new("pnpm").arg("install"),
            &options.package_path,
            options.dry_run,
        )
    }

    fn build(&self, options: &RefreshOptions) -> Step {
        self.command_step(
            "build",
            CommandLine::new("pnpm").args(["run", "build"]),
            &options.package_path,
            options.dry_run,
        )
    }

    fn command_step(&self, step: &str, command: CommandLine, cwd: &Path, dry_run: bool) -> Step {
        if dry_run {
            return (StepResult::ok(step, format!("Would run: {command}")), true);
        }

        info!(%command, "running");
        match self.runner.run(&command.clone().current_dir(cwd)) {
            Ok(_) => (StepResult::ok(step, format!("{command} succeeded")), true),
            Err(e) => (StepResult::failed(step, format!("{command} failed: {e}")), false),
        }
    }

    /// Commit and push pending changes. The status check runs even in dry
    /// run mode since it only reads.
    fn git(&self, options: &RefreshOptions) -> Step {
        if options.skip_git {
            return (StepResult::skipped("git", "Skipped (git disabled)"), true);
        }

        let cwd = &options.package_path;
        let run = |command: CommandLine| self.runner.run(&command.current_dir(cwd));

        let status = match run(CommandLine::new("git").args(["status", "--porcelain"])) {
            Ok(output) => output.stdout,
            Err(e) => {
                return (StepResult::failed("git", format!("Git operations failed: {e}")), false);
            }
        };

        if status.trim().is_empty() {
            info!("No changes to commit");
            return (StepResult::ok("git", "No changes to commit"), true);
        }

        if options.dry_run {
            return (StepResult::ok("git", "Would commit and push changes"), true);
        }

        let message = format!(
            "Refreshed package {}\n\n{COMMIT_TRAILER}",
            options.package_name
        );
        let result = run(CommandLine::new("git").args(["add", "-A"]))
            .and_then(|_| run(CommandLine::new("git").args(["commit", "-m", message.as_str()])))
            .and_then(|_| run(CommandLine::new("git").arg("push")));

        match result {
            Ok(_) => {
                info!("Committed and pushed changes");
                (StepResult::ok("git", "Committed and pushed changes"), true)
            }
            Err(e) => (StepResult::failed("git", format!("Git operations failed: {e}")), false),
        }
    }
}
