//! Feature dependency graph and preset resolution.
//!
//! A [`FeatureConfig`] names every feature with its prerequisites and every
//! preset with its directly-requested features. A [`FeatureResolver`] owns
//! one config and expands a preset into the transitively-closed
//! [`ActiveFeatures`] set.
//!
//! ```text
//! preset "react-lib" = [react, cue, vitest]
//!
//!   react ─▶ ts ─▶ npm ─▶ git(Core)
//!   cue ───────────▶ npm
//!   vitest ─▶ ts
//!
//! resolve("react-lib") = {Core, Npm, Ts, Vitest, React, Cue}
//! ```
//!
//! Nothing here fails: unknown presets, unknown names and missing dependency
//! entries all degrade to "absent".

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::{error::DomainError, feature::Feature};

/// Prerequisites of one feature name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl FeatureSpec {
    pub fn new<I, S>(dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}

/// Feature graph plus preset table, in the `features.json` shape:
///
/// ```json
/// { "features": { "ts": { "dependencies": ["npm"] } },
///   "presets":  { "lib": ["ts", "cue", "vitest"] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub features: IndexMap<String, FeatureSpec>,
    #[serde(default)]
    pub presets: IndexMap<String, Vec<String>>,
}

impl FeatureConfig {
    /// The configuration shipped with the tool.
    pub fn builtin() -> Self {
        let features = [
            ("git", vec![]),
            ("npm", vec!["git"]),
            ("ts", vec!["npm"]),
            ("react", vec!["ts"]),
            ("node", vec!["ts"]),
            ("node-cjs", vec!["ts"]),
            ("vite", vec!["ts"]),
            ("vite-react", vec!["vite", "react"]),
            ("cue", vec!["npm"]),
            ("vitest", vec!["ts"]),
        ]
        .into_iter()
        .map(|(name, deps)| (name.to_string(), FeatureSpec::new(deps)))
        .collect();

        let presets = [
            ("lib", vec!["ts", "cue", "vitest"]),
            ("react-lib", vec!["react", "cue", "vitest"]),
            ("app", vec!["vite-react", "cue", "vitest"]),
        ]
        .into_iter()
        .map(|(name, list)| {
            (
                name.to_string(),
                list.into_iter().map(String::from).collect(),
            )
        })
        .collect();

        Self { features, presets }
    }

    /// Parse a `features.json` document. No semantic validation happens
    /// here; dangling names simply resolve to nothing.
    pub fn from_json(source: &str) -> Result<Self, DomainError> {
        serde_json::from_str(source).map_err(|e| DomainError::InvalidFeatureConfig {
            reason: e.to_string(),
        })
    }

    /// Declared prerequisites of `name` (empty when undeclared).
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.features
            .get(name)
            .map(|spec| spec.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// Directly-requested names of `preset` (empty when unknown).
    pub fn preset(&self, preset: &str) -> &[String] {
        self.presets
            .get(preset)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// The resolved feature set of one generation run. Always contains
/// [`Feature::Core`] when produced by [`FeatureResolver::resolve`].
///
/// Iteration follows [`Feature`] declaration order, not the order the
/// graph was expanded in. Every ordered output derived from the set
/// (the `dependencies.json` list, `--inject` flags) uses that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFeatures(BTreeSet<Feature>);

impl ActiveFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn insert(&mut self, feature: Feature) -> bool {
        self.0.insert(feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical names, sorted by variant order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|f| f.as_str()).collect()
    }
}

impl FromIterator<Feature> for ActiveFeatures {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ActiveFeatures {
    type Item = &'a Feature;
    type IntoIter = std::collections::btree_set::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for ActiveFeatures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// An absent gate is always active; otherwise plain membership.
pub fn is_feature_active(feature: Option<Feature>, active: &ActiveFeatures) -> bool {
    feature.is_none_or(|f| active.contains(f))
}

/// Resolves presets against an explicitly owned [`FeatureConfig`].
///
/// Load once, resolve many times. Replacing the config with
/// [`set_config`](Self::set_config) affects every later resolution.
#[derive(Debug, Clone)]
pub struct FeatureResolver {
    config: FeatureConfig,
}

impl FeatureResolver {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FeatureConfig) {
        self.config = config;
    }

    /// Expand `preset` into its transitive closure, Core included.
    ///
    /// An unknown preset resolves to `{Core}`.
    pub fn resolve(&self, preset: &str) -> ActiveFeatures {
        let active = resolve_features(preset, &self.config);
        debug!(preset, features = %active, "features resolved");
        active
    }

    /// Preset names, in configuration order.
    pub fn presets(&self) -> Vec<&str> {
        self.config.presets.keys().map(String::as_str).collect()
    }

    /// Directly-requested names of `preset` (empty when unknown).
    pub fn preset_features(&self, preset: &str) -> &[String] {
        self.config.preset(preset)
    }
}

/// Transitive closure of `preset` under `config`, Core included.
///
/// A mapped feature that is already active stops its branch, which keeps a
/// cyclic config from recursing forever. Unmapped names add no feature but
/// still expand their prerequisites, each at most once.
pub fn resolve_features(preset: &str, config: &FeatureConfig) -> ActiveFeatures {
    let mut active = ActiveFeatures::new();
    active.insert(Feature::Core);

    let mut visited_unmapped = HashSet::new();
    for name in config.preset(preset) {
        expand(config, name, &mut active, &mut visited_unmapped);
    }
    active
}

fn expand(
    config: &FeatureConfig,
    name: &str,
    active: &mut ActiveFeatures,
    visited_unmapped: &mut HashSet<String>,
) {
    match Feature::from_name(name) {
        Some(feature) => {
            if !active.insert(feature) {
                return;
            }
        }
        None => {
            if !visited_unmapped.insert(name.to_string()) {
                return;
            }
            trace!(name, "feature name has no mapping");
        }
    }

    for dep in config.dependencies_of(name) {
        expand(config, dep, active, visited_unmapped);
    }
}

impl Default for FeatureResolver {
    fn default() -> Self {
        Self::new(FeatureConfig::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(features: &[Feature]) -> ActiveFeatures {
        features.iter().copied().collect()
    }

    #[test]
    fn react_lib_resolves_to_exactly_six_features() {
        let resolver = FeatureResolver::default();
        let active = resolver.resolve("react-lib");

        assert_eq!(
            active,
            set(&[
                Feature::Core,
                Feature::React,
                Feature::Ts,
                Feature::Npm,
                Feature::Cue,
                Feature::Vitest,
            ])
        );
        assert_eq!(active.len(), 6);
    }

    #[test]
    fn every_builtin_preset_contains_core() {
        let resolver = FeatureResolver::default();
        for preset in resolver.presets() {
            assert!(resolver.resolve(preset).contains(Feature::Core), "{preset}");
        }
    }

    #[test]
    fn lib_preset_excludes_react() {
        let active = FeatureResolver::default().resolve("lib");
        assert!(active.contains(Feature::Ts));
        assert!(active.contains(Feature::Npm));
        assert!(!active.contains(Feature::React));
        assert!(!active.contains(Feature::Vite));
    }

    #[test]
    fn app_preset_pulls_vite_and_react() {
        let active = FeatureResolver::default().resolve("app");
        assert!(active.contains(Feature::Vite));
        assert!(active.contains(Feature::React));
        assert!(active.contains(Feature::Ts));
        assert!(active.contains(Feature::Cue));
    }

    #[test]
    fn iteration_follows_declaration_order_not_expansion_order() {
        // Expansion visits ts, npm, cue, vitest.
        let names: Vec<&str> = FeatureResolver::default()
            .resolve("lib")
            .iter()
            .map(|f| f.as_str())
            .collect();
        assert_eq!(names, ["core", "npm", "ts", "vitest", "cue"]);
    }

    #[test]
    fn unknown_preset_is_core_only() {
        let active = FeatureResolver::default().resolve("does-not-exist");
        assert_eq!(active, set(&[Feature::Core]));
    }

    #[test]
    fn resolution_is_idempotent() {
        let resolver = FeatureResolver::default();
        assert_eq!(resolver.resolve("app"), resolver.resolve("app"));
        assert_eq!(
            resolve_features("app", &FeatureConfig::builtin()),
            resolver.resolve("app")
        );
    }

    #[test]
    fn unknown_feature_names_are_ignored() {
        let mut config = FeatureConfig::default();
        config
            .presets
            .insert("odd".into(), vec!["webpack".into(), "npm".into()]);
        config
            .features
            .insert("npm".into(), FeatureSpec::new(["git"]));

        let active = FeatureResolver::new(config).resolve("odd");
        assert_eq!(active, set(&[Feature::Core, Feature::Npm]));
    }

    #[test]
    fn unmapped_names_still_expand_their_dependencies() {
        let mut config = FeatureConfig::default();
        config.presets.insert("p".into(), vec!["bundle".into()]);
        config
            .features
            .insert("bundle".into(), FeatureSpec::new(["ts"]));
        config.features.insert("ts".into(), FeatureSpec::new(["npm"]));

        let active = FeatureResolver::new(config).resolve("p");
        assert_eq!(active, set(&[Feature::Core, Feature::Ts, Feature::Npm]));
    }

    #[test]
    fn cyclic_config_terminates() {
        let mut config = FeatureConfig::default();
        config.presets.insert("loop".into(), vec!["ts".into()]);
        config.features.insert("ts".into(), FeatureSpec::new(["npm"]));
        config.features.insert("npm".into(), FeatureSpec::new(["ts"]));
        config.features.insert("a".into(), FeatureSpec::new(["b"]));
        config.features.insert("b".into(), FeatureSpec::new(["a"]));
        config.presets.insert("unmapped-loop".into(), vec!["a".into()]);

        let resolver = FeatureResolver::new(config);
        assert_eq!(
            resolver.resolve("loop"),
            set(&[Feature::Core, Feature::Ts, Feature::Npm])
        );
        assert_eq!(resolver.resolve("unmapped-loop"), set(&[Feature::Core]));
    }

    #[test]
    fn set_config_replaces_wholesale() {
        let mut resolver = FeatureResolver::default();
        let mut config = FeatureConfig::default();
        config.presets.insert("lib".into(), vec!["cue".into()]);
        resolver.set_config(config);

        // "cue" no longer has declared dependencies.
        assert_eq!(resolver.resolve("lib"), set(&[Feature::Core, Feature::Cue]));
        assert_eq!(resolver.presets(), vec!["lib"]);
    }

    #[test]
    fn absent_gate_is_always_active() {
        assert!(is_feature_active(None, &ActiveFeatures::new()));
        assert!(is_feature_active(None, &set(&[Feature::Ts])));
    }

    #[test]
    fn gate_is_membership() {
        let active = set(&[Feature::Core, Feature::Ts]);
        assert!(is_feature_active(Some(Feature::Ts), &active));
        assert!(!is_feature_active(Some(Feature::Vitest), &active));
    }

    #[test]
    fn preset_listing_follows_config_order() {
        let resolver = FeatureResolver::default();
        assert_eq!(resolver.presets(), vec!["lib", "react-lib", "app"]);
        assert_eq!(resolver.preset_features("lib"), ["ts", "cue", "vitest"]);
        assert!(resolver.preset_features("nope").is_empty());
    }

    #[test]
    fn parses_features_json() {
        let config = FeatureConfig::from_json(
            r#"{
                "features": { "git": { "dependencies": [] }, "npm": { "dependencies": ["git"] } },
                "presets": { "tiny": ["npm"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.dependencies_of("npm"), ["git"]);
        let active = FeatureResolver::new(config).resolve("tiny");
        assert_eq!(active, set(&[Feature::Core, Feature::Npm]));
    }

    #[test]
    fn missing_dependencies_key_defaults_to_empty() {
        let config =
            FeatureConfig::from_json(r#"{ "features": { "ts": {} }, "presets": {} }"#).unwrap();
        assert!(config.dependencies_of("ts").is_empty());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            FeatureConfig::from_json("{ not json"),
            Err(DomainError::InvalidFeatureConfig { .. })
        ));
    }
}
