//! The ecosystem manifest: one JSON document listing every package of the
//! ecosystem, keyed by scoped package name.
//!
//! The document is held as raw JSON. Registering a package inserts one key
//! under `packages`; every other key, entry field and key order survives a
//! rewrite.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// Where a package lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// e.g. `github:owner/name#main`
    pub repo: String,
    /// Directory relative to the ecosystem root.
    pub path: String,
}

impl ManifestEntry {
    pub fn github(owner: &str, name: &str) -> Self {
        Self {
            repo: format!("github:{owner}/{name}#main"),
            path: name.to_string(),
        }
    }

    fn to_value(&self) -> Value {
        serde_json::json!({ "repo": self.repo, "path": self.path })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EcosystemManifest {
    document: Map<String, Value>,
}

impl EcosystemManifest {
    pub fn from_json(source: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(source).map_err(invalid)?;
        match value {
            Value::Object(document) => Ok(Self { document }),
            other => Err(DomainError::InvalidManifest {
                reason: format!("expected an object, found {}", kind_of(&other)),
            }),
        }
    }

    /// Pretty JSON, two-space indent, trailing newline.
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(&self.document)
            .map(|json| json + "\n")
            .map_err(invalid)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages()
            .is_some_and(|packages| packages.contains_key(package))
    }

    /// The raw entry for `package`, whatever fields it carries.
    pub fn entry(&self, package: &str) -> Option<&Value> {
        self.packages()?.get(package)
    }

    /// Register a package. Returns `Ok(false)` and leaves the manifest
    /// untouched when the package is already listed. A missing `packages`
    /// key is created at the end of the document.
    pub fn add_package(
        &mut self,
        package: impl Into<String>,
        entry: ManifestEntry,
    ) -> Result<bool, DomainError> {
        let packages = match self
            .document
            .entry("packages")
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(packages) => packages,
            other => {
                return Err(DomainError::InvalidManifest {
                    reason: format!("\"packages\" is {}, not an object", kind_of(other)),
                });
            }
        };

        let package = package.into();
        if packages.contains_key(&package) {
            return Ok(false);
        }
        packages.insert(package, entry.to_value());
        Ok(true)
    }

    fn packages(&self) -> Option<&Map<String, Value>> {
        self.document.get("packages")?.as_object()
    }
}

fn invalid(e: serde_json::Error) -> DomainError {
    DomainError::InvalidManifest {
        reason: e.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
