//! Generation Service - turns (package name, preset, root path) into files.
//!
//! This service coordinates one generation run:
//! 1. Check the registry against the schema (hard precondition)
//! 2. Resolve the preset into active features
//! 3. Select the active part of the schema
//! 4. Dispatch every active file to its generator
//! 5. Write the result with rollback on failure

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, GeneratorRegistry, ports::Filesystem},
    domain::{
        ActiveFeatures, DomainValidator as validator, FeatureResolver, FsEntry, GeneratorContext,
        GeneratorKind, NodeMetadata, ProjectStructure, SchemaNode, plan_active,
    },
    error::{ScaffoldError, ScaffoldResult},
};

/// Placeholder written into every generated directory.
pub const GITKEEP: &str = ".gitkeep";

const DEFAULT_PRESET: &str = "lib";
const DEFAULT_SCOPE: &str = "@mark1russell7";

/// What to generate, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub name: String,
    pub preset: String,
    /// npm scope, `@` included.
    pub scope: String,
    /// Directory that will contain the package directory.
    pub root_path: PathBuf,
}

impl PackageRequest {
    pub fn new(name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            preset: DEFAULT_PRESET.into(),
            scope: DEFAULT_SCOPE.into(),
            root_path: root_path.into(),
        }
    }

    pub fn preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// `@scope/name`
    pub fn full_package_name(&self) -> String {
        format!("{}/{}", self.scope.trim_end_matches('/'), self.name)
    }
}

/// A file selected for generation, with the backend that will produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: String,
    pub generator: GeneratorKind,
}

/// Everything a run would do, computed without running any generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub package_path: PathBuf,
    pub features: ActiveFeatures,
    pub directories: Vec<String>,
    pub files: Vec<PlannedFile>,
    pub skipped: Vec<String>,
}

/// Schema-driven package generation.
pub struct GenerationService {
    schema: SchemaNode,
    registry: GeneratorRegistry,
    resolver: FeatureResolver,
    filesystem: Box<dyn Filesystem>,
}

impl GenerationService {
    pub fn new(
        schema: SchemaNode,
        registry: GeneratorRegistry,
        resolver: FeatureResolver,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            schema,
            registry,
            resolver,
            filesystem,
        }
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &FeatureResolver {
        &self.resolver
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.filesystem.as_ref()
    }

    /// Build the run's context. The package name is validated here; an
    /// unknown preset is not an error and resolves to Core only.
    pub fn context(&self, request: &PackageRequest) -> ScaffoldResult<GeneratorContext> {
        validator::validate_package_name(&request.name)?;

        let features = self.resolver.resolve(&request.preset);
        if self.resolver.preset_features(&request.preset).is_empty() {
            warn!(preset = %request.preset, "preset is unknown or empty; only core is active");
        }

        Ok(GeneratorContext::new(
            request.name.clone(),
            request.full_package_name(),
            features,
            request.preset.clone(),
            request.root_path.clone(),
        ))
    }

    /// Directory the package is written to: the root path joined with the
    /// schema root's rendered name (the short name when unnamed).
    pub fn package_path(&self, ctx: &GeneratorContext) -> PathBuf {
        let name = match self.schema.metadata() {
            NodeMetadata::Directory(meta) => meta
                .name
                .as_deref()
                .map(|template| ctx.render_context().render(template)),
            NodeMetadata::File(_) => None,
        };
        ctx.root_path()
            .join(name.unwrap_or_else(|| ctx.package_name().to_string()))
    }

    /// Compute what a run would produce. Fails on a malformed schema or a
    /// registry mismatch.
    #[instrument(skip_all, fields(package = %ctx.package_name(), preset = %ctx.preset()))]
    pub fn plan(&self, ctx: &GeneratorContext) -> ScaffoldResult<GenerationPlan> {
        validator::validate_schema(&self.schema)?;
        self.registry.ensure_complete(&self.schema)?;

        let active = plan_active(&self.schema, ctx.features());
        for path in &active.skipped {
            debug!(%path, "skipped (feature not active)");
        }

        Ok(GenerationPlan {
            package_path: self.package_path(ctx),
            features: ctx.features().clone(),
            directories: active.directories,
            files: active
                .files
                .into_iter()
                .map(|f| PlannedFile {
                    path: f.path,
                    generator: f.metadata.generator.clone(),
                })
                .collect(),
            skipped: active.skipped,
        })
    }

    /// Run every active generator and collect the output in memory.
    ///
    /// The first generator failure aborts the run; nothing is written.
    #[instrument(skip_all, fields(package = %ctx.package_name()))]
    pub fn generate(&self, ctx: &GeneratorContext) -> ScaffoldResult<ProjectStructure> {
        let plan = self.plan(ctx)?;
        info!(features = %plan.features, "generating package");

        let mut structure = ProjectStructure::new(&plan.package_path);
        for dir in &plan.directories {
            structure.add_directory(dir);
            structure.add_file(format!("{dir}/{GITKEEP}"), String::new());
        }
        for file in &plan.files {
            let content = self.registry.dispatch(&file.path, ctx)?;
            debug!(path = %file.path, bytes = content.len(), "generated");
            structure.add_file(&file.path, content);
        }

        validator::validate_project_structure(&structure)?;
        Ok(structure)
    }

    /// Generate and write in one step.
    #[instrument(skip_all, fields(package = %request.name, preset = %request.preset))]
    pub fn scaffold(&self, request: &PackageRequest) -> ScaffoldResult<ProjectStructure> {
        let ctx = self.context(request)?;
        let structure = self.generate(&ctx)?;
        self.write(&structure)?;
        info!(path = %structure.root().display(), "package created");
        Ok(structure)
    }

    /// Write project structure to filesystem with rollback on failure.
    pub fn write(&self, structure: &ProjectStructure) -> ScaffoldResult<()> {
        if self.filesystem.exists(structure.root()) {
            return Err(ApplicationError::ProjectExists {
                path: structure.root().to_path_buf(),
            }
            .into());
        }

        match self.write_all(structure) {
            Ok(()) => {
                info!(entries = structure.entry_count(), "wrote all entries");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(structure.root(), &e)?;
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> ScaffoldResult<()> {
        self.filesystem.create_dir_all(structure.root())?;

        for entry in structure.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem
                        .create_dir_all(&structure.root().join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = structure.root().join(&file.path);
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                }
            }
        }

        Ok(())
    }

    /// Remove the partial package. A failed cleanup replaces `cause` with
    /// `RollbackFailed`, which still mentions it.
    fn rollback(&self, root: &Path, cause: &ScaffoldError) -> ScaffoldResult<()> {
        if !self.filesystem.exists(root) {
            return Ok(());
        }
        self.filesystem.remove_dir_all(root).map_err(|e| {
            warn!(error = %e, path = %root.display(), "Rollback failed");
            ScaffoldError::from(ApplicationError::RollbackFailed {
                path: root.to_path_buf(),
                reason: format!("{e} (after: {cause})"),
            })
        })?;
        info!("Rollback successful");
        Ok(())
    }
}
