//! Template backend.
//!
//! Templates are looked up by name. A template is either a function of the
//! generator context or a text body with `{{placeholder}}` variables.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use scaffold_core::{
    application::ApplicationError,
    domain::{DomainError, Feature, GeneratorContext},
    error::{Context, ScaffoldResult},
};

/// Name of the built-in dependency-list template.
pub const DEPENDENCIES_TEMPLATE: &str = "dependencies.json.ejs";

type TemplateFn = dyn Fn(&GeneratorContext) -> ScaffoldResult<String> + Send + Sync;

#[derive(Clone)]
enum Template {
    Function(Arc<TemplateFn>),
    Text(String),
}

/// Named templates. Cloning shares function templates.
#[derive(Clone)]
pub struct TemplateLibrary {
    templates: HashMap<String, Template>,
}

impl fmt::Debug for TemplateLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names();
        names.sort_unstable();
        f.debug_struct("TemplateLibrary").field("templates", &names).finish()
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateLibrary {
    /// No templates at all.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// The built-in set: [`DEPENDENCIES_TEMPLATE`].
    pub fn builtin() -> Self {
        let mut library = Self::empty();
        library.register_template(DEPENDENCIES_TEMPLATE, dependencies_json);
        library
    }

    /// Register (or replace) a function template.
    pub fn register_template<F>(&mut self, name: impl Into<String>, template: F)
    where
        F: Fn(&GeneratorContext) -> ScaffoldResult<String> + Send + Sync + 'static,
    {
        self.templates
            .insert(name.into(), Template::Function(Arc::new(template)));
    }

    /// Register (or replace) a text template.
    pub fn register_text(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.templates.insert(name.into(), Template::Text(body.into()));
    }

    /// Load every file under `dir` as a text template named by its path
    /// relative to `dir`, with forward slashes.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn load_dir(&mut self, dir: &Path) -> ScaffoldResult<usize> {
        if !dir.is_dir() {
            return Err(ApplicationError::filesystem(dir, "template directory not found").into());
        }

        let mut loaded = 0;
        for entry in WalkDir::new(dir).min_depth(1) {
            let entry = entry.map_err(|e| ApplicationError::filesystem(dir, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(dir) else {
                warn!(path = %path.display(), "skipping template outside directory");
                continue;
            };
            let name = relative.to_string_lossy().replace('\\', "/");
            let body = fs::read_to_string(path)
                .map_err(|e| ApplicationError::filesystem(path, e.to_string()))?;

            debug!(template = %name, "loaded template");
            self.register_text(name, body);
            loaded += 1;
        }

        Ok(loaded)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Fail with [`DomainError::UnknownTemplate`] unless `name` exists.
    pub fn require(&self, name: &str) -> Result<(), DomainError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(DomainError::UnknownTemplate {
                name: name.to_string(),
            })
        }
    }

    pub fn render(&self, name: &str, ctx: &GeneratorContext) -> ScaffoldResult<String> {
        match self.templates.get(name) {
            Some(Template::Function(template)) => template(ctx),
            Some(Template::Text(body)) => Ok(ctx.render_context().render(body)),
            None => Err(DomainError::UnknownTemplate {
                name: name.to_string(),
            }
            .into()),
        }
    }
}

/// `{"features": [...]}` listing the active features other than core.
fn dependencies_json(ctx: &GeneratorContext) -> ScaffoldResult<String> {
    let features: Vec<&str> = ctx
        .features()
        .iter()
        .filter(|f| *f != Feature::Core)
        .map(|f| f.as_str())
        .collect();
    let mut out = serde_json::to_string_pretty(&json!({ "features": features }))
        .context("Failed to render dependency list")?;
    out.push('\n');
    Ok(out)
}
