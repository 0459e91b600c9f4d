//! `scaffold refresh`: reinstall, rebuild and commit an existing package.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use scaffold_adapters::{LocalFilesystem, SystemCommandRunner};
use scaffold_core::application::{RefreshOptions, RefreshService};

use crate::{
    cli::RefreshArgs,
    config::expand_home,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: RefreshArgs, output: OutputManager) -> CliResult<()> {
    let path = match &args.path {
        Some(path) => expand_home(&path.to_string_lossy()),
        None => std::env::current_dir()?,
    };
    let name = args.name.clone().unwrap_or_else(|| package_name(&path));
    debug!(path = %path.display(), %name, "Refresh target resolved");

    let mut options = RefreshOptions::new(path, name.clone());
    options.force = args.force;
    options.skip_git = args.skip_git;
    options.dry_run = args.dry_run;

    let service = RefreshService::new(
        Box::new(SystemCommandRunner::new()),
        Box::new(LocalFilesystem::new()),
    );

    let spinner = output.spinner(&format!("Refreshing {name}..."));
    let result = service.run(&options);
    spinner.finish_and_clear();
    let report = result?;

    output.report(&report)?;
    if let Some(failed) = report.failed_step() {
        return Err(CliError::StepFailed {
            step: failed.step.clone(),
            message: failed.message.clone(),
        });
    }
    if !output.is_json() {
        output.success(&format!("Refreshed {name}"))?;
    }
    Ok(())
}

/// `name` from `package.json` when readable, else the directory name.
fn package_name(path: &Path) -> String {
    fs::read_to_string(path.join("package.json"))
        .ok()
        .and_then(|source| serde_json::from_str::<serde_json::Value>(&source).ok())
        .and_then(|manifest| manifest.get("name")?.as_str().map(str::to_string))
        .unwrap_or_else(|| directory_name(path))
}

fn directory_name(path: &Path) -> String {
    let absolute: PathBuf = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "package".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn name_comes_from_package_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("package.json"),
            r#"{ "name": "@acme/widgets", "version": "0.1.0" }"#,
        )
        .unwrap();
        assert_eq!(package_name(tmp.path()), "@acme/widgets");
    }

    #[test]
    fn name_falls_back_to_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("gadgets");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("package.json"), "not json").unwrap();
        assert_eq!(package_name(&dir), "gadgets");
    }
}
