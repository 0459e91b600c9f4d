//! Scaffold Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers of the schema-driven package scaffolder,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           scaffold-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (Generation, Bootstrap, Refresh)        │
//! │  + GeneratorRegistry (validated)        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, CommandRunner, Generator)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    scaffold-adapters (Infrastructure)   │
//! │ (LocalFilesystem, SystemCommandRunner,  │
//! │  external/synthesis/template backends)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Feature graph, Schema tree, Walker)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scaffold_core::{
//!     application::{GenerationService, PackageRequest},
//!     domain::{FeatureResolver, repo_schema},
//! };
//! # fn wire() -> scaffold_core::error::ScaffoldResult<()> {
//! # let registry: scaffold_core::application::GeneratorRegistry = todo!();
//! # let filesystem: Box<dyn scaffold_core::application::Filesystem> = todo!();
//! let service = GenerationService::new(
//!     repo_schema().clone(),
//!     registry,   // GeneratorRegistry built from the schema
//!     FeatureResolver::default(),
//!     filesystem, // impl Filesystem
//! );
//! service.scaffold(&PackageRequest::new("my-lib", "/home/me/git").preset("lib"))?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BootstrapOptions, BootstrapService, GenerationService, GeneratorRegistry, PackageRequest,
        RefreshOptions, RefreshService, RegistryReport, validate_registry,
        ports::{CommandLine, CommandOutput, CommandRunner, Filesystem, Generator, GeneratorBackend},
    };
    pub use crate::domain::{
        ActiveFeatures, Feature, FeatureConfig, FeatureResolver, GeneratorContext, GeneratorKind,
        ProjectStructure, RenderContext, SchemaNode, StepResult, SynthesisFn, WorkflowReport,
        directory_paths, file_paths, is_feature_active, repo_schema, resolve_features, walk_schema,
    };
    pub use crate::error::{ScaffoldError, ScaffoldResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
