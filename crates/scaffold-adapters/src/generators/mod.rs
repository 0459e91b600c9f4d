//! Generator backends.
//!
//! [`Backends`] maps a schema node's [`GeneratorKind`] onto one of:
//! - [`ExternalGenerator`]: `cue eval` through a [`CommandRunner`]
//! - [`synthesis`]: TypeScript built in memory
//! - [`TemplateLibrary`]: named templates

pub mod external;
pub mod synthesis;
pub mod template;

use std::sync::Arc;

use scaffold_core::{
    application::ports::{CommandRunner, Generator, GeneratorBackend},
    domain::{GeneratorContext, GeneratorKind, SynthesisFn},
    error::ScaffoldResult,
};

pub use external::ExternalGenerator;
pub use synthesis::{SourceFile, synthesize};
pub use template::{DEPENDENCIES_TEMPLATE, TemplateLibrary};

/// The production [`GeneratorBackend`].
#[derive(Clone)]
pub struct Backends {
    runner: Arc<dyn CommandRunner>,
    templates: Arc<TemplateLibrary>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl Backends {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_templates(runner, TemplateLibrary::builtin())
    }

    pub fn with_templates(runner: Arc<dyn CommandRunner>, templates: TemplateLibrary) -> Self {
        Self {
            runner,
            templates: Arc::new(templates),
        }
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }
}

struct SynthesisGenerator(SynthesisFn);

impl Generator for SynthesisGenerator {
    fn generate(&self, _path: &str, ctx: &GeneratorContext) -> ScaffoldResult<String> {
        Ok(synthesize(self.0, ctx))
    }
}

struct TemplateGenerator {
    name: String,
    templates: Arc<TemplateLibrary>,
}

impl Generator for TemplateGenerator {
    fn generate(&self, _path: &str, ctx: &GeneratorContext) -> ScaffoldResult<String> {
        self.templates.render(&self.name, ctx)
    }
}

struct EmptyGenerator;

impl Generator for EmptyGenerator {
    fn generate(&self, _path: &str, _ctx: &GeneratorContext) -> ScaffoldResult<String> {
        Ok(String::new())
    }
}

impl GeneratorBackend for Backends {
    fn build(&self, kind: &GeneratorKind) -> ScaffoldResult<Box<dyn Generator>> {
        Ok(match kind {
            GeneratorKind::External { expression } => {
                Box::new(ExternalGenerator::new(expression, Arc::clone(&self.runner)))
            }
            GeneratorKind::Synthesis { function } => Box::new(SynthesisGenerator(*function)),
            GeneratorKind::Template { template } => {
                self.templates.require(template)?;
                Box::new(TemplateGenerator {
                    name: template.clone(),
                    templates: Arc::clone(&self.templates),
                })
            }
            GeneratorKind::None => Box::new(EmptyGenerator),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingCommandRunner;
    use scaffold_core::{
        domain::{DomainError, Feature},
        error::ScaffoldError,
    };

    fn backends() -> Backends {
        Backends::new(Arc::new(RecordingCommandRunner::new()))
    }

    fn ctx() -> GeneratorContext {
        GeneratorContext::new(
            "widgets",
            "@acme/widgets",
            [Feature::Core, Feature::Ts].into_iter().collect(),
            "lib",
            "/work",
        )
    }

    #[test]
    fn unknown_template_fails_at_build_time() {
        let err = backends()
            .build(&GeneratorKind::template("README.md.ejs"))
            .err()
            .unwrap();
        assert_eq!(
            err,
            ScaffoldError::Domain(DomainError::UnknownTemplate {
                name: "README.md.ejs".into()
            })
        );
    }

    #[test]
    fn none_kind_yields_empty_content() {
        let generator = backends().build(&GeneratorKind::None).unwrap();
        assert_eq!(generator.generate("empty.txt", &ctx()).unwrap(), "");
    }

    #[test]
    fn template_kind_renders_from_library() {
        let generator = backends()
            .build(&GeneratorKind::template(DEPENDENCIES_TEMPLATE))
            .unwrap();
        assert_eq!(
            generator.generate("dependencies.json", &ctx()).unwrap(),
            "{\n  \"features\": [\n    \"ts\"\n  ]\n}\n"
        );
    }

    #[test]
    fn custom_templates_are_buildable() {
        let mut library = TemplateLibrary::builtin();
        library.register_text("README.md.ejs", "# {{fullPackageName}}\n");
        let backends = Backends::with_templates(Arc::new(RecordingCommandRunner::new()), library);

        let generator = backends.build(&GeneratorKind::template("README.md.ejs")).unwrap();
        assert_eq!(generator.generate("README.md", &ctx()).unwrap(), "# @acme/widgets\n");
    }

    #[test]
    fn synthesis_kind_runs_function() {
        let generator = backends()
            .build(&GeneratorKind::synthesis(SynthesisFn::RegisterTs))
            .unwrap();
        assert!(
            generator
                .generate("src/register.ts", &ctx())
                .unwrap()
                .contains("registerProcedures([]);")
        );
    }
}
