//! Implementation of the `scaffold new` command.
//!
//! Responsibility: translate CLI arguments into a `PackageRequest` and
//! `BootstrapOptions`, run the bootstrap workflow, and display results. No
//! business logic lives here.

use std::io::IsTerminal as _;

use tracing::{debug, info, instrument};

use scaffold_adapters::SystemCommandRunner;
use scaffold_core::application::{BootstrapOptions, BootstrapService, PackageRequest};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::{AppConfig, expand_home},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `scaffold new` command.
///
/// 1. Merge arguments over configured defaults
/// 2. Confirm with the user when attached to a terminal
/// 3. Run the bootstrap workflow (generate, cue, git, GitHub, manifest)
/// 4. Print each step and the next steps
#[instrument(skip_all, fields(package = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, &config);
    let options = build_options(&args, &config);

    debug!(
        preset = %request.preset,
        root = %request.root_path.display(),
        dry_run = options.dry_run,
        "Request resolved"
    );

    if should_confirm(&args, &global, &output) {
        show_request(&request, &options, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let service = BootstrapService::new(
        super::generation_service(&config)?,
        Box::new(SystemCommandRunner::new()),
    );

    info!(package = %request.full_package_name(), "Bootstrap started");
    let spinner = output.spinner(&format!("Creating {}...", request.full_package_name()));
    let result = service.run(&request, &options);
    spinner.finish_and_clear();
    let report = result?;

    output.report(&report)?;
    if let Some(failed) = report.failed_step() {
        return Err(CliError::StepFailed {
            step: failed.step.clone(),
            message: failed.message.clone(),
        });
    }

    if output.is_json() {
        return Ok(());
    }
    if options.dry_run {
        output.info("Dry run: nothing was written")?;
        return Ok(());
    }

    output.success(&format!(
        "Package '{}' created!",
        request.full_package_name()
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!(
        "  cd {}",
        request.root_path.join(&request.name).display()
    ))?;
    output.print("  pnpm install && pnpm run build")?;

    Ok(())
}

fn build_request(args: &NewArgs, config: &AppConfig) -> PackageRequest {
    let root = args
        .root
        .as_ref()
        .map(|p| expand_home(&p.to_string_lossy()))
        .unwrap_or_else(|| config.root_path());

    PackageRequest::new(args.name.clone(), root)
        .preset(
            args.preset
                .clone()
                .unwrap_or_else(|| config.defaults.preset.clone()),
        )
        .scope(
            args.scope
                .clone()
                .unwrap_or_else(|| config.package.scope.clone()),
        )
}

fn build_options(args: &NewArgs, config: &AppConfig) -> BootstrapOptions {
    BootstrapOptions {
        github_owner: args
            .owner
            .clone()
            .unwrap_or_else(|| config.package.github_owner.clone()),
        skip_cue: args.skip_cue,
        skip_git: args.skip_git,
        skip_github: args.skip_github,
        skip_manifest: args.skip_manifest,
        dry_run: args.dry_run,
    }
}

fn should_confirm(args: &NewArgs, global: &GlobalArgs, output: &OutputManager) -> bool {
    !args.yes
        && !args.dry_run
        && !global.quiet
        && !output.is_json()
        && std::io::stdin().is_terminal()
}

fn show_request(
    request: &PackageRequest,
    options: &BootstrapOptions,
    output: &OutputManager,
) -> CliResult<()> {
    output.header("Package configuration:")?;
    output.print(&format!("  Name:    {}", request.full_package_name()))?;
    output.print(&format!("  Preset:  {}", request.preset))?;
    output.print(&format!(
        "  Path:    {}",
        request.root_path.join(&request.name).display()
    ))?;

    let skipped: Vec<&str> = [
        (options.skip_cue, "cue"),
        (options.skip_git, "git"),
        (options.skip_github, "github"),
        (options.skip_manifest, "manifest"),
    ]
    .into_iter()
    .filter_map(|(skip, name)| skip.then_some(name))
    .collect();
    if !skipped.is_empty() {
        output.print(&format!("  Skip:    {}", skipped.join(", ")))?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation input".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}
