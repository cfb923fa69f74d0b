//! Application layer: compiler, scaffolding and the export service
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod compiler;
pub mod error;
pub mod error_ext;
pub mod scaffold;
pub mod services;

pub use compiler::{CommandCompiler, CommandUnit, CompiledAnimation};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
