//! animpack: compiles baked rig animations into a data pack of function files.
//!
//! Layers, innermost first:
//! - [`domain`]: rig and animation entities, frame search trees, naming, SNBT
//! - [`application`]: command compiler, data pack scaffolding, export service
//! - [`infrastructure`]: filesystem boundary, virtual file tree, project loading, DI
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
