//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Compile baked rig animations into a data pack of function files
#[derive(Parser, Debug)]
#[command(name = "animpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Project directory used for local config lookup (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a project document as a data pack
    Export {
        /// Project document (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        project: PathBuf,
        /// Datapack folder, overrides exporter.datapack_folder
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: Option<PathBuf>,
        /// Interpolation ticks, overrides exporter.interpolation_duration
        #[arg(long)]
        interpolation_duration: Option<u32>,
    },

    /// Show the search tree built over a number of frames
    Tree {
        /// Frame count
        frames: usize,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
