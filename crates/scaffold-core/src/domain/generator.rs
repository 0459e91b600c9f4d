//! Generator backend selection and the per-run generator context.
//!
//! Each file node in the schema names exactly one [`GeneratorKind`]. The
//! variant carries the instruction its backend needs, so a template-backed
//! file without a template name cannot be expressed.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{error::DomainError, feature_graph::ActiveFeatures};

/// Which backend produces a file, and with what instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Delegate to an external config evaluator with this expression
    /// (e.g. `npm/package:output`).
    External { expression: String },
    /// Build the source in memory with a named synthesis function.
    Synthesis { function: SynthesisFn },
    /// Render a named template.
    Template { template: String },
    /// No content is generated; the file is created empty.
    None,
}

impl GeneratorKind {
    pub fn external(expression: impl Into<String>) -> Self {
        Self::External {
            expression: expression.into(),
        }
    }

    pub fn synthesis(function: SynthesisFn) -> Self {
        Self::Synthesis { function }
    }

    pub fn template(template: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
        }
    }

    /// Short backend label used in logs and listings.
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::External { .. } => "external",
            Self::Synthesis { .. } => "synthesis",
            Self::Template { .. } => "template",
            Self::None => "none",
        }
    }

    /// The backend-specific instruction, if any.
    pub fn instruction(&self) -> Option<&str> {
        match self {
            Self::External { expression } => Some(expression),
            Self::Synthesis { function } => Some(function.as_str()),
            Self::Template { template } => Some(template),
            Self::None => None,
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instruction() {
            Some(instruction) => write!(f, "{}({instruction})", self.backend()),
            None => f.write_str(self.backend()),
        }
    }
}

/// Named in-memory source synthesis functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisFn {
    VitestConfig,
    IndexTs,
    TestFile,
    RegisterTs,
}

impl SynthesisFn {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VitestConfig => "generateVitestConfig",
            Self::IndexTs => "generateIndexTs",
            Self::TestFile => "generateTestFile",
            Self::RegisterTs => "generateRegisterTs",
        }
    }
}

impl fmt::Display for SynthesisFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynthesisFn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generateVitestConfig" => Ok(Self::VitestConfig),
            "generateIndexTs" => Ok(Self::IndexTs),
            "generateTestFile" => Ok(Self::TestFile),
            "generateRegisterTs" => Ok(Self::RegisterTs),
            other => Err(DomainError::UnknownSynthesisFunction {
                name: other.to_string(),
            }),
        }
    }
}

/// Everything a generator may read about the run. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorContext {
    package_name: String,
    full_package_name: String,
    features: ActiveFeatures,
    preset: String,
    root_path: PathBuf,
}

impl GeneratorContext {
    pub fn new(
        package_name: impl Into<String>,
        full_package_name: impl Into<String>,
        features: ActiveFeatures,
        preset: impl Into<String>,
        root_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            full_package_name: full_package_name.into(),
            features,
            preset: preset.into(),
            root_path: root_path.into(),
        }
    }

    /// Short name, e.g. `scaffold`.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Scoped name, e.g. `@mark1russell7/scaffold`.
    pub fn full_package_name(&self) -> &str {
        &self.full_package_name
    }

    pub fn features(&self) -> &ActiveFeatures {
        &self.features
    }

    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// Directory that holds the package directory.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// `root_path/package_name`.
    pub fn package_path(&self) -> PathBuf {
        self.root_path.join(&self.package_name)
    }

    /// Placeholder variables exposed to templates.
    pub fn render_context(&self) -> RenderContext {
        RenderContext::new()
            .with_variable("packageName", &self.package_name)
            .with_variable("fullPackageName", &self.full_package_name)
            .with_variable("preset", &self.preset)
    }
}

/// `{{name}}` placeholder substitution.
///
/// Unknown placeholders are left as-is.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::Feature;

    fn context() -> GeneratorContext {
        GeneratorContext::new(
            "widgets",
            "@acme/widgets",
            [Feature::Core, Feature::Ts].into_iter().collect(),
            "lib",
            "/work",
        )
    }

    #[test]
    fn synthesis_names_parse() {
        assert_eq!(
            "generateIndexTs".parse::<SynthesisFn>().unwrap(),
            SynthesisFn::IndexTs
        );
        let err = "generateNothing".parse::<SynthesisFn>().unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownSynthesisFunction {
                name: "generateNothing".into()
            }
        );
    }

    #[test]
    fn kind_exposes_its_instruction() {
        assert_eq!(
            GeneratorKind::external("npm/package:output").instruction(),
            Some("npm/package:output")
        );
        assert_eq!(
            GeneratorKind::synthesis(SynthesisFn::VitestConfig).instruction(),
            Some("generateVitestConfig")
        );
        assert_eq!(GeneratorKind::None.instruction(), None);
        assert_eq!(
            GeneratorKind::template("dependencies.json.ejs").to_string(),
            "template(dependencies.json.ejs)"
        );
    }

    #[test]
    fn package_path_joins_root_and_name() {
        assert_eq!(context().package_path(), PathBuf::from("/work/widgets"));
    }

    #[test]
    fn render_context_substitutes_known_placeholders() {
        let rendered = context()
            .render_context()
            .render("{{packageName}} is {{fullPackageName}} ({{preset}}) {{unknown}}");
        assert_eq!(rendered, "widgets is @acme/widgets (lib) {{unknown}}");
    }
}
