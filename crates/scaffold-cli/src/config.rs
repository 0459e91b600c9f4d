//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `SCAFFOLD_*` environment variables, `__` between sections
//!    (`SCAFFOLD_DEFAULTS__PRESET=app`)
//! 3. `--config FILE`, else `.scaffold.toml` in the current directory, else
//!    the platform config file
//! 4. Built-in defaults (always present)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use scaffold_adapters::TemplateLibrary;
use scaffold_core::domain::{FeatureConfig, FeatureResolver};

use crate::error::{CliError, CliResult};

/// File name of a per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = ".scaffold.toml";

const ENV_PREFIX: &str = "SCAFFOLD";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default values for new packages.
    pub defaults: Defaults,
    /// Naming and hosting of generated packages.
    pub package: PackageConfig,
    /// Feature graph source.
    pub features: FeaturesConfig,
    /// Extra text templates.
    pub templates: TemplatesConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub preset: String,
    /// May start with `~/`.
    pub root_path: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            preset: "lib".into(),
            root_path: "~/git".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub scope: String,
    pub github_owner: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            scope: "@mark1russell7".into(),
            github_owner: "mark1russell7".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// JSON feature configuration replacing the built-in graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory of text templates, named by relative path. A file named
    /// like a built-in template replaces it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, one file and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = toml::to_string(&Self::default())
            .context("Failed to serialise default configuration")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults,
            config::FileFormat::Toml,
        ));

        match config_file {
            Some(path) => {
                anyhow::ensure!(
                    path.is_file(),
                    "configuration file not found: {}",
                    path.display()
                );
                info!(path = %path.display(), "Loading config file");
                builder = builder.add_source(
                    config::File::from(path.as_path()).format(config::FileFormat::Toml),
                );
            }
            None => {
                if let Some(path) = Self::discovered_path() {
                    debug!(path = %path.display(), "Loading config file");
                    builder = builder.add_source(
                        config::File::from(path.as_path()).format(config::FileFormat::Toml),
                    );
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.scaffold.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "mark1russell7", "scaffold")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file [`load`](Self::load) reads when no `--config` is given.
    pub fn discovered_path() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        let global = Self::config_path();
        global.is_file().then_some(global)
    }

    /// `defaults.root_path` with `~/` expanded.
    pub fn root_path(&self) -> PathBuf {
        expand_home(&self.defaults.root_path)
    }

    /// Resolver over `features.config_path` when set, else the built-in
    /// graph.
    pub fn feature_resolver(&self) -> CliResult<FeatureResolver> {
        let mut resolver = FeatureResolver::default();
        if let Some(path) = &self.features.config_path {
            let path = expand_home(&path.to_string_lossy());
            resolver.set_config(load_feature_config(&path)?);
        }
        Ok(resolver)
    }

    /// Built-in templates plus everything under `templates.dir`.
    pub fn template_library(&self) -> CliResult<TemplateLibrary> {
        let mut library = TemplateLibrary::builtin();
        if let Some(dir) = &self.templates.dir {
            let dir = expand_home(&dir.to_string_lossy());
            let loaded = library.load_dir(&dir).map_err(|e| CliError::ConfigError {
                message: format!("Failed to load templates from '{}'", dir.display()),
                source: Some(Box::new(e)),
            })?;
            debug!(dir = %dir.display(), loaded, "Loaded templates");
        }
        Ok(library)
    }

    /// Value of a dotted key, as printed by `scaffold config get`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let value = match key {
            "defaults.preset" => self.defaults.preset.clone(),
            "defaults.root_path" => self.defaults.root_path.clone(),
            "package.scope" => self.package.scope.clone(),
            "package.github_owner" => self.package.github_owner.clone(),
            "features.config_path" => self
                .features
                .config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "templates.dir" => self
                .templates
                .dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => {
                return Err(CliError::ConfigError {
                    message: format!("Unknown config key: '{key}'"),
                    source: None,
                });
            }
        };
        Ok(value)
    }
}

fn load_feature_config(path: &Path) -> CliResult<FeatureConfig> {
    let source = fs::read_to_string(path).map_err(|e| CliError::ConfigError {
        message: format!("Failed to read feature config '{}'", path.display()),
        source: Some(Box::new(e)),
    })?;
    FeatureConfig::from_json(&source).map_err(|e| CliError::ConfigError {
        message: format!("Invalid feature config '{}': {e}", path.display()),
        source: Some(Box::new(e)),
    })
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => dirs::home_dir()
            .map(|home| home.join(rest.trim_start_matches('/')))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_ecosystem() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.preset, "lib");
        assert_eq!(cfg.package.scope, "@mark1russell7");
        assert_eq!(cfg.package.github_owner, "mark1russell7");
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("scaffold.toml");
        fs::write(&path, "[defaults]\npreset = \"app\"\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.preset, "app");
        assert_eq!(cfg.defaults.root_path, "~/git");
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&tmp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("defaults.preset").unwrap(), "lib");
        assert_eq!(cfg.get("output.no_color").unwrap(), "false");
        assert_eq!(cfg.get("features.config_path").unwrap(), "");
        assert_eq!(cfg.get("templates.dir").unwrap(), "");
        assert!(matches!(
            cfg.get("does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/git"), home.join("git"));
            assert_eq!(expand_home("~"), home);
        }
        assert_eq!(expand_home("/srv/git"), PathBuf::from("/srv/git"));
        assert_eq!(expand_home("~other/git"), PathBuf::from("~other/git"));
    }

    #[test]
    fn feature_config_file_replaces_builtin_graph() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("features.json");
        fs::write(
            &path,
            r#"{"features": {"ts": {"dependencies": []}}, "presets": {"tiny": ["ts"]}}"#,
        )
        .unwrap();

        let mut cfg = AppConfig::default();
        cfg.features.config_path = Some(path);
        let resolver = cfg.feature_resolver().unwrap();
        assert_eq!(resolver.presets(), ["tiny"]);
    }

    #[test]
    fn invalid_feature_config_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("features.json");
        fs::write(&path, "not json").unwrap();

        let mut cfg = AppConfig::default();
        cfg.features.config_path = Some(path);
        assert!(matches!(
            cfg.feature_resolver(),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn templates_dir_adds_and_replaces_templates() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dependencies.json.ejs"), "{{packageName}}\n").unwrap();
        fs::write(tmp.path().join("README.md"), "# {{fullPackageName}}\n").unwrap();

        let mut cfg = AppConfig::default();
        cfg.templates.dir = Some(tmp.path().to_path_buf());
        let library = cfg.template_library().unwrap();

        assert!(library.contains("README.md"));
        let ctx = scaffold_core::domain::GeneratorContext::new(
            "widgets",
            "@acme/widgets",
            [scaffold_core::domain::Feature::Core].into_iter().collect(),
            "lib",
            "/work",
        );
        assert_eq!(
            library.render("dependencies.json.ejs", &ctx).unwrap(),
            "widgets\n"
        );
    }

    #[test]
    fn missing_templates_dir_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = AppConfig::default();
        cfg.templates.dir = Some(tmp.path().join("nope"));
        assert!(matches!(
            cfg.template_library(),
            Err(CliError::ConfigError { .. })
        ));
    }
}
