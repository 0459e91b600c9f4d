//! Command handlers, one module per subcommand.

pub mod check;
pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod presets;
pub mod refresh;
pub mod schema;

use std::sync::Arc;

use scaffold_adapters::{LocalFilesystem, SystemCommandRunner, registry_with_templates};
use scaffold_core::{application::GenerationService, domain::repo_schema};

use crate::{config::AppConfig, error::CliResult};

/// Generation service over the local filesystem and real processes, with
/// templates from `templates.dir` layered over the built-in ones.
pub(crate) fn generation_service(config: &AppConfig) -> CliResult<GenerationService> {
    let registry = registry_with_templates(
        Arc::new(SystemCommandRunner::new()),
        config.template_library()?,
    )?;
    Ok(GenerationService::new(
        repo_schema().clone(),
        registry,
        config.feature_resolver()?,
        Box::new(LocalFilesystem::new()),
    ))
}
