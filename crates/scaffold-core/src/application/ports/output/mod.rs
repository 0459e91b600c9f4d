//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `scaffold-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{GeneratorContext, GeneratorKind};
use crate::error::ScaffoldResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `scaffold_adapters::filesystem::LocalFilesystem` (production)
/// - `scaffold_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ScaffoldResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()>;

    /// Read a file as UTF-8.
    fn read_file(&self, path: &Path) -> ScaffoldResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ScaffoldResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> ScaffoldResult<()>;
}

/// One external program invocation. Arguments are passed as-is, never
/// through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Port for running external programs.
///
/// Implementations return `ApplicationError::CommandFailed` both when the
/// program cannot be started and when it exits unsuccessfully.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &CommandLine) -> ScaffoldResult<CommandOutput>;
}

/// Port for a content generator bound to schema file paths.
///
/// Closures with the matching signature are generators too, which keeps
/// ad-hoc registrations short:
///
/// ```rust
/// use scaffold_core::{application::GeneratorRegistry, domain::GeneratorContext, error::ScaffoldResult};
///
/// let mut registry = GeneratorRegistry::new();
/// registry.register(
///     "README.md",
///     |_path: &str, ctx: &GeneratorContext| -> ScaffoldResult<String> {
///         Ok(format!("# {}\n", ctx.full_package_name()))
///     },
/// );
/// ```
pub trait Generator: Send + Sync {
    /// Produce the content of the file at `path`.
    fn generate(&self, path: &str, ctx: &GeneratorContext) -> ScaffoldResult<String>;
}

impl<F> Generator for F
where
    F: Fn(&str, &GeneratorContext) -> ScaffoldResult<String> + Send + Sync,
{
    fn generate(&self, path: &str, ctx: &GeneratorContext) -> ScaffoldResult<String> {
        self(path, ctx)
    }
}

/// Port that turns a schema node's [`GeneratorKind`] into a runnable
/// generator. Unknown identifiers fail here, at registry construction.
pub trait GeneratorBackend: Send + Sync {
    fn build(&self, kind: &GeneratorKind) -> ScaffoldResult<Box<dyn Generator>>;
}
