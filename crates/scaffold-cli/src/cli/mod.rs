//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "scaffold",
    bin_name = "scaffold",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Schema-driven package scaffolding",
    long_about = "scaffold creates ecosystem packages from a fixed schema. \
                  A preset selects features, features gate files, and every \
                  file is produced by a registered generator.",
    after_help = "EXAMPLES:\n\
        \x20 scaffold new my-lib --preset lib\n\
        \x20 scaffold new my-ui  --preset react-lib --dry-run\n\
        \x20 scaffold features react-lib\n\
        \x20 scaffold completions bash > /usr/share/bash-completion/completions/scaffold",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create and bootstrap a new package.
    #[command(
        visible_alias = "n",
        about = "Create a new package",
        after_help = "EXAMPLES:\n\
            \x20 scaffold new my-lib\n\
            \x20 scaffold new my-app --preset app --root ~/work\n\
            \x20 scaffold new my-lib --skip-github --skip-manifest --yes"
    )]
    New(NewArgs),

    /// Reinstall, rebuild and commit an existing package.
    #[command(
        about = "Refresh an existing package",
        after_help = "EXAMPLES:\n\
            \x20 scaffold refresh\n\
            \x20 scaffold refresh ~/git/my-lib --force\n\
            \x20 scaffold refresh --skip-git --dry-run"
    )]
    Refresh(RefreshArgs),

    /// List presets and their features.
    #[command(visible_alias = "ls", about = "List available presets")]
    Presets,

    /// Show the resolved feature set of a preset.
    #[command(about = "Resolve a preset into active features")]
    Features(FeaturesArgs),

    /// Print the package schema.
    #[command(about = "Show the package schema")]
    Schema(SchemaArgs),

    /// Validate the generator registry against the schema.
    #[command(about = "Check generator registry completeness")]
    Check,

    /// Initialise a scaffold configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 scaffold init           # default location\n\
            \x20 scaffold init --local   # .scaffold.toml in CWD\n\
            \x20 scaffold init --force   # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 scaffold completions bash > ~/.local/share/bash-completion/completions/scaffold\n\
            \x20 scaffold completions zsh  > ~/.zfunc/_scaffold\n\
            \x20 scaffold completions fish > ~/.config/fish/completions/scaffold.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the scaffold configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 scaffold config get defaults.preset\n\
            \x20 scaffold config list\n\
            \x20 scaffold config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `scaffold new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Package short name, e.g. `my-lib`.
    #[arg(value_name = "NAME", help = "Package name")]
    pub name: String,

    /// Feature preset.
    #[arg(
        short = 'p',
        long = "preset",
        value_name = "PRESET",
        help = "Feature preset (default from config, else lib)"
    )]
    pub preset: Option<String>,

    /// Directory that will contain the package.
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        help = "Parent directory for the package (default from config)"
    )]
    pub root: Option<PathBuf>,

    /// npm scope.
    #[arg(long = "scope", value_name = "SCOPE", help = "npm scope, e.g. @acme")]
    pub scope: Option<String>,

    /// GitHub owner for the remote repository.
    #[arg(long = "owner", value_name = "OWNER", help = "GitHub owner")]
    pub owner: Option<String>,

    #[arg(long = "skip-cue", help = "Skip cue-config init/generate/validate")]
    pub skip_cue: bool,

    #[arg(long = "skip-git", help = "Skip git init and initial commit")]
    pub skip_git: bool,

    #[arg(long = "skip-github", help = "Skip GitHub repository creation")]
    pub skip_github: bool,

    #[arg(long = "skip-manifest", help = "Skip ecosystem manifest registration")]
    pub skip_manifest: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── refresh ───────────────────────────────────────────────────────────────────

/// Arguments for `scaffold refresh`.
#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Package directory (default: current directory).
    #[arg(value_name = "PATH", help = "Package directory")]
    pub path: Option<PathBuf>,

    /// Package name used in the commit message.
    #[arg(
        long = "name",
        value_name = "NAME",
        help = "Package name (default: package.json name, else directory name)"
    )]
    pub name: Option<String>,

    #[arg(short = 'f', long = "force", help = "Delete build artifacts first")]
    pub force: bool,

    #[arg(long = "skip-git", help = "Do not commit or push")]
    pub skip_git: bool,

    #[arg(long = "dry-run", help = "Describe steps without running them")]
    pub dry_run: bool,
}

// ── features / schema ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FeaturesArgs {
    /// Preset to resolve.
    #[arg(value_name = "PRESET")]
    pub preset: String,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Only show nodes active for this preset.
    #[arg(short = 'p', long = "preset", value_name = "PRESET")]
    pub preset: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `scaffold init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.scaffold.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `scaffold completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `scaffold config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.preset`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "scaffold",
            "new",
            "my-lib",
            "--preset",
            "react-lib",
            "--skip-github",
        ]);
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.name, "my-lib");
                assert_eq!(args.preset.as_deref(), Some("react-lib"));
                assert!(args.skip_github);
                assert!(!args.skip_git);
            }
            other => panic!("expected New command, got {other:?}"),
        }
    }

    #[test]
    fn refresh_path_is_optional() {
        let cli = Cli::parse_from(["scaffold", "refresh", "--force"]);
        match cli.command {
            Commands::Refresh(args) => {
                assert!(args.path.is_none());
                assert!(args.force);
            }
            other => panic!("expected Refresh command, got {other:?}"),
        }
    }

    #[test]
    fn features_requires_preset() {
        assert!(Cli::try_parse_from(["scaffold", "features"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["scaffold", "--quiet", "--verbose", "presets"]);
        assert!(result.is_err());
    }
}
