//! `scaffold check`: validate the generator registry against the schema.

use std::sync::Arc;

use tracing::info;

use scaffold_adapters::{Backends, SystemCommandRunner};
use scaffold_core::{
    application::{GeneratorRegistry, RegistryReport},
    domain::{file_paths, repo_schema},
    error::ScaffoldError,
};

use crate::{config::AppConfig, error::CliResult, output::OutputManager};

pub fn execute(config: AppConfig, output: OutputManager) -> CliResult<()> {
    let schema = repo_schema();
    let backends =
        Backends::with_templates(Arc::new(SystemCommandRunner::new()), config.template_library()?);
    let registry = GeneratorRegistry::from_schema(schema, &backends)?;
    let report = registry.validate(schema);
    info!(valid = report.valid, generators = registry.len(), "Registry checked");

    if output.is_json() {
        output.json(&serde_json::json!({
            "valid": report.valid,
            "files": file_paths(schema).len(),
            "generators": registry.len(),
            "missing": report.missing,
            "extra": report.extra,
        }))?;
    } else {
        print_report(&registry, &report, &output)?;
    }

    report.into_result().map_err(ScaffoldError::from)?;
    Ok(())
}

fn print_report(
    registry: &GeneratorRegistry,
    report: &RegistryReport,
    output: &OutputManager,
) -> CliResult<()> {
    for path in file_paths(repo_schema()) {
        match registry.kind_of(&path) {
            Some(kind) => output.print(&format!("  {path}  [{kind}]"))?,
            None => output.error(&format!("{path}: no generator"))?,
        }
    }
    for path in &report.extra {
        output.warning(&format!("{path}: generator without schema file"))?;
    }

    if report.valid {
        output.success(&format!(
            "Registry complete: {} generators for {} files",
            registry.len(),
            file_paths(repo_schema()).len()
        ))?;
    }
    Ok(())
}
