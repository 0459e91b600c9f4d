//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a package" or "refresh a package".

pub mod bootstrap_service;
pub mod generation_service;
pub mod refresh_service;

pub use bootstrap_service::{BootstrapOptions, BootstrapService};
pub use generation_service::{
    GenerationPlan, GenerationService, PackageRequest, PlannedFile,
};
pub use refresh_service::{RefreshOptions, RefreshService};
