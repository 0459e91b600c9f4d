//! Infrastructure adapters for scaffold.
//!
//! This crate implements the ports defined in `scaffold_core::application::ports`.
//! It contains all process and filesystem I/O.

pub mod filesystem;
pub mod generators;
pub mod process;

use std::sync::Arc;

use scaffold_core::{
    application::{GeneratorRegistry, ports::CommandRunner},
    domain::repo_schema,
    error::ScaffoldResult,
};

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use generators::{Backends, TemplateLibrary};
pub use process::{RecordingCommandRunner, SystemCommandRunner};

/// Registry for the canonical package schema, with external evaluation
/// going through `runner`.
pub fn builtin_registry(runner: Arc<dyn CommandRunner>) -> ScaffoldResult<GeneratorRegistry> {
    registry_with_templates(runner, TemplateLibrary::builtin())
}

/// Like [`builtin_registry`], with a custom template library.
pub fn registry_with_templates(
    runner: Arc<dyn CommandRunner>,
    templates: TemplateLibrary,
) -> ScaffoldResult<GeneratorRegistry> {
    let registry =
        GeneratorRegistry::from_schema(repo_schema(), &Backends::with_templates(runner, templates))?;
    registry.ensure_complete(repo_schema())?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_core::domain::file_paths;

    #[test]
    fn builtin_registry_covers_the_schema() {
        let registry = builtin_registry(Arc::new(RecordingCommandRunner::new())).unwrap();
        let keys: Vec<&str> = registry.keys().collect();
        assert_eq!(keys, file_paths(repo_schema()));
        assert!(registry.validate(repo_schema()).valid);
    }

    #[test]
    fn builtin_registry_fails_without_dependency_template() {
        let err = registry_with_templates(
            Arc::new(RecordingCommandRunner::new()),
            TemplateLibrary::empty(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("dependencies.json.ejs"));
    }
}
