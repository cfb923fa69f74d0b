//! Infrastructure layer: I/O implementations, virtual file tree and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod project;
pub mod traits;
pub mod vfs;

pub use error::{InfraError, InfraResult};
