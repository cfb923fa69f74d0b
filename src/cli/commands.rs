//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::build_index_tree;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::project::load_project;
use crate::infrastructure::InfraError;
use crate::util::path::resolve_against;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see animpack --help".to_string(),
        ));
    };
    let project_dir = project_dir(cli)?;

    match command {
        Commands::Export {
            project,
            output,
            interpolation_duration,
        } => cmd_export(
            &project_dir,
            project,
            output.as_deref(),
            *interpolation_duration,
        ),
        Commands::Tree { frames } => cmd_tree(*frames),
        Commands::Config { command } => cmd_config(&project_dir, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

/// Settings from all config layers plus command line overrides.
fn effective_settings(
    project_dir: &Path,
    output: Option<&Path>,
    interpolation_duration: Option<u32>,
) -> CliResult<Settings> {
    let mut settings = Settings::load(Some(project_dir))?;
    let exporter = &mut settings.exporter;
    if let Some(dir) = output {
        exporter.datapack_folder = dir.to_path_buf();
    } else if !exporter.datapack_folder.as_os_str().is_empty() {
        exporter.datapack_folder = resolve_against(project_dir, &exporter.datapack_folder);
    }
    if let Some(ticks) = interpolation_duration {
        exporter.interpolation_duration = ticks;
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

#[instrument(level = "debug", skip(project_dir))]
fn cmd_export(
    project_dir: &Path,
    project: &Path,
    output: Option<&Path>,
    interpolation_duration: Option<u32>,
) -> CliResult<()> {
    let settings = effective_settings(project_dir, output, interpolation_duration)?;
    let container = ServiceContainer::new(settings);
    let input = load_project(container.fs.as_ref(), project)?;

    let service = container.export_service();
    let mut progress = 0usize;
    let report = service.export(&input, &mut |n| {
        progress += n;
        if progress % 500 == 0 {
            debug!("{} entries written", progress);
        }
    })?;

    output::success(&format!(
        "exported {} animation(s) of '{}'",
        report.animations, input.project.namespace
    ));
    output::action("Data pack", &report.path.display());
    output::detail(&format!("{} entries written", report.written));
    Ok(())
}

fn cmd_tree(frames: usize) -> CliResult<()> {
    let tree = build_index_tree(frames).map_err(ApplicationError::from)?;
    output::info(&tree.to_tree_string());
    output::detail(&format!(
        "{} leaves, {} branches, depth {}",
        tree.leaf_count(),
        tree.branch_count(),
        tree.depth()
    ));
    Ok(())
}

fn cmd_config(project_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::action("Global", &describe(&path)),
                None => output::warning("no home directory, global config unavailable"),
            }
            output::action("Local", &describe(&local_config_path(project_dir)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no home directory, cannot place global config".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn describe(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}
