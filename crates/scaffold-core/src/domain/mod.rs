// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer.
//!
//! Pure data and rules: the feature graph, the package schema, generator
//! identities and the shapes of generated output. No process, filesystem,
//! or network access happens here; those live behind the application ports.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: parsing from strings is as close to the outside as it gets
//! - **Immutable values**: domain objects are Clone + PartialEq
//! - **Explicit state**: the feature configuration is owned by a resolver
//!   value, never a process-wide cell
//!
// Public API - what the world sees
pub mod error;
pub mod feature;
pub mod feature_graph;
pub mod generator;
pub mod manifest;
pub mod project_structure;
pub mod schema;
pub mod workflow;

mod validation;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use feature::Feature;
pub use feature_graph::{
    ActiveFeatures, FeatureConfig, FeatureResolver, FeatureSpec, is_feature_active, resolve_features,
};
pub use generator::{GeneratorContext, GeneratorKind, RenderContext, SynthesisFn};
pub use manifest::{EcosystemManifest, ManifestEntry};
pub use project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure};
pub use schema::{
    ActiveFile, DirectoryMetadata, FileMetadata, FsType, NodeMetadata, SchemaNode, SchemaPlan,
    directory_paths, file_paths, plan_active, repo_schema, walk_schema,
};
pub use validation::DomainValidator;
pub use workflow::{StepResult, WorkflowReport};
