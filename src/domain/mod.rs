//! Domain layer: entities, frame trees and naming
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod frame_tree;
pub mod names;
pub mod snbt;

pub use builder::{build_frame_tree, build_index_tree};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use frame_tree::FrameTreeNode;
pub use names::ArtifactNamer;
pub use snbt::{matrix_to_snbt, Snbt};
