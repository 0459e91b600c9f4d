//! Application layer.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (generation, bootstrap, refresh)
//! - **Registry**: Schema path → generator mapping and its completeness check
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod registry;
pub mod services;

pub use services::{
    BootstrapOptions, BootstrapService, GenerationPlan, GenerationService, PackageRequest,
    PlannedFile, RefreshOptions, RefreshService,
};

pub use registry::{GeneratorRegistry, RegistryReport, validate_registry};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandLine, CommandOutput, CommandRunner, Filesystem, Generator, GeneratorBackend,
};

pub use error::ApplicationError;
