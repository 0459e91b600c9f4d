//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `scaffold-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `CommandRunner`: External program invocation
//!   - `Generator`: Content for one schema file path
//!   - `GeneratorBackend`: Builds generators from schema generator kinds
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

#[cfg(test)]
pub use output::MockCommandRunner;
pub use output::{
    CommandLine, CommandOutput, CommandRunner, Filesystem, Generator, GeneratorBackend,
};
