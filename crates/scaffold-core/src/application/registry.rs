//! Generator registry: schema file path → generator.
//!
//! The registry is only usable for a run once its key set equals the
//! schema's file paths. [`validate_registry`] computes the difference;
//! [`GeneratorRegistry::ensure_complete`] turns a mismatch into a hard error.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Generator, GeneratorBackend},
    },
    domain::{
        DomainError, DomainValidator, GeneratorContext, GeneratorKind, NodeMetadata, SchemaNode,
        file_paths, walk_schema,
    },
    error::{ScaffoldError, ScaffoldResult},
};

/// Result of comparing registry keys with schema file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryReport {
    pub valid: bool,
    /// Schema file paths with no generator, in schema order.
    pub missing: Vec<String>,
    /// Registry keys with no schema file, in registry order.
    pub extra: Vec<String>,
}

impl RegistryReport {
    pub fn into_result(self) -> Result<(), ApplicationError> {
        if self.valid {
            Ok(())
        } else {
            Err(ApplicationError::RegistryIncomplete {
                missing: self.missing,
                extra: self.extra,
            })
        }
    }
}

/// Set difference between `file_paths(schema)` and `keys`.
pub fn validate_registry<'a, I>(schema: &SchemaNode, keys: I) -> RegistryReport
where
    I: IntoIterator<Item = &'a str>,
{
    let schema_paths = file_paths(schema);
    let keys: Vec<&str> = keys.into_iter().collect();

    let registered: HashSet<&str> = keys.iter().copied().collect();
    let declared: HashSet<&str> = schema_paths.iter().map(String::as_str).collect();

    let missing: Vec<String> = schema_paths
        .iter()
        .filter(|p| !registered.contains(p.as_str()))
        .cloned()
        .collect();
    let extra: Vec<String> = keys
        .iter()
        .filter(|k| !declared.contains(*k))
        .map(|k| k.to_string())
        .collect();

    RegistryReport {
        valid: missing.is_empty() && extra.is_empty(),
        missing,
        extra,
    }
}

struct Entry {
    kind: Option<GeneratorKind>,
    generator: Box<dyn Generator>,
}

/// Path-keyed generators. Keys keep registration order.
#[derive(Default)]
pub struct GeneratorRegistry {
    entries: IndexMap<String, Entry>,
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One generator per file node of `schema`, built from the node's
    /// generator kind by `backend`. A malformed schema is refused.
    #[instrument(skip_all)]
    pub fn from_schema(schema: &SchemaNode, backend: &dyn GeneratorBackend) -> ScaffoldResult<Self> {
        DomainValidator::validate_schema(schema)?;

        let mut kinds = Vec::new();
        walk_schema(schema, "", &mut |path, metadata, _| {
            if let NodeMetadata::File(meta) = metadata {
                kinds.push((path.to_string(), meta.generator.clone()));
            }
        });

        let mut registry = Self::new();
        for (path, kind) in kinds {
            let generator = backend.build(&kind)?;
            debug!(%path, generator = %kind, "generator registered");
            registry.entries.insert(
                path,
                Entry {
                    kind: Some(kind),
                    generator,
                },
            );
        }
        Ok(registry)
    }

    /// Register `generator` under `path`, replacing any earlier entry.
    pub fn register(&mut self, path: impl Into<String>, generator: impl Generator + 'static) {
        self.entries.insert(
            path.into(),
            Entry {
                kind: None,
                generator: Box::new(generator),
            },
        );
    }

    pub fn with(mut self, path: impl Into<String>, generator: impl Generator + 'static) -> Self {
        self.register(path, generator);
        self
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn unregister(&mut self, path: &str) -> bool {
        self.entries.shift_remove(path).is_some()
    }

    pub fn get_generator(&self, path: &str) -> Option<&dyn Generator> {
        self.entries.get(path).map(|e| e.generator.as_ref())
    }

    /// The schema generator kind the entry was built from, if it came from
    /// [`from_schema`](Self::from_schema).
    pub fn kind_of(&self, path: &str) -> Option<&GeneratorKind> {
        self.entries.get(path).and_then(|e| e.kind.as_ref())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validate(&self, schema: &SchemaNode) -> RegistryReport {
        validate_registry(schema, self.keys())
    }

    /// Fail with `RegistryIncomplete` unless keys equal the schema's files.
    pub fn ensure_complete(&self, schema: &SchemaNode) -> ScaffoldResult<()> {
        self.validate(schema).into_result().map_err(ScaffoldError::from)
    }

    /// Run the generator for `path`.
    ///
    /// A missing entry is `MissingGenerator`. A generator's own failure is
    /// wrapped as `GeneratorFailed` naming the path, except for unknown
    /// template or synthesis identifiers, which keep their own error.
    pub fn dispatch(&self, path: &str, ctx: &GeneratorContext) -> ScaffoldResult<String> {
        let generator = self
            .get_generator(path)
            .ok_or_else(|| ApplicationError::MissingGenerator {
                path: path.to_string(),
            })?;

        generator.generate(path, ctx).map_err(|e| match e {
            ScaffoldError::Domain(
                DomainError::UnknownTemplate { .. } | DomainError::UnknownSynthesisFunction { .. },
            )
            | ScaffoldError::Application(ApplicationError::GeneratorFailed { .. }) => e,
            other => ApplicationError::GeneratorFailed {
                path: path.to_string(),
                reason: other.to_string(),
            }
            .into(),
        })
    }
}
