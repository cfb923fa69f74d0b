//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/animpack/animpack.toml`
//! 3. Local config: `<project_dir>/.animpack.toml`
//! 4. Environment variables: `ANIMPACK_*` prefix
//!
//! Command line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::util::path::expand_env_vars;

/// Data pack format written to `pack.mcmeta` unless configured otherwise.
pub const DEFAULT_PACK_FORMAT: u32 = 12;

/// Exporter settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExporterSettings {
    /// Folder the data pack is written into; the pack lands in `<folder>/<namespace>`
    pub datapack_folder: PathBuf,
    /// Ticks every display interpolates between two frames
    pub interpolation_duration: u32,
    pub pack_format: u32,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            datapack_folder: PathBuf::new(),
            interpolation_duration: 1,
            pack_format: DEFAULT_PACK_FORMAT,
        }
    }
}

/// Raw exporter config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExporterSettings {
    pub datapack_folder: Option<PathBuf>,
    pub interpolation_duration: Option<u32>,
    pub pack_format: Option<u32>,
}

impl ExporterSettings {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawExporterSettings) -> Self {
        Self {
            datapack_folder: overlay
                .datapack_folder
                .clone()
                .unwrap_or_else(|| self.datapack_folder.clone()),
            interpolation_duration: overlay
                .interpolation_duration
                .unwrap_or(self.interpolation_duration),
            pack_format: overlay.pack_format.unwrap_or(self.pack_format),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub exporter: RawExporterSettings,
}

/// Unified configuration for animpack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub exporter: ExporterSettings,
}

/// Get the XDG config directory for animpack.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "animpack").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("animpack.toml"))
}

/// Get the path to the local config file of a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".animpack.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let folder = &self.exporter.datapack_folder;
        if !folder.as_os_str().is_empty() {
            let expanded = expand_env_vars(folder.to_string_lossy().as_ref());
            self.exporter.datapack_folder = PathBuf::from(expanded);
        }
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            exporter: self.exporter.merge(&overlay.exporter),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding a local `.animpack.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = project_dir {
            current = current.merge_local(dir)?;
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Merges `<dir>/.animpack.toml` if it exists.
    pub fn merge_local(&self, dir: &Path) -> Result<Self, ApplicationError> {
        let local_path = local_config_path(dir);
        if !local_path.exists() {
            return Ok(self.clone());
        }
        debug!("local config: {}", local_path.display());
        Ok(self.merge_with(&load_raw_settings(&local_path)?))
    }

    /// Apply ANIMPACK_* environment variables as explicit overrides,
    /// e.g. `ANIMPACK_EXPORTER__DATAPACK_FOLDER`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ANIMPACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("exporter.datapack_folder") {
            settings.exporter.datapack_folder = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("exporter.interpolation_duration") {
            settings.exporter.interpolation_duration = parse_number(
                "ANIMPACK_EXPORTER__INTERPOLATION_DURATION",
                &val,
            )?;
        }
        if let Ok(val) = config.get_string("exporter.pack_format") {
            settings.exporter.pack_format =
                parse_number("ANIMPACK_EXPORTER__PACK_FORMAT", &val)?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# animpack configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/animpack/animpack.toml
#   Local:  <project_dir>/.animpack.toml
#   Env:    ANIMPACK_* environment variables, e.g. ANIMPACK_EXPORTER__DATAPACK_FOLDER
#   Flags:  animpack export -o DIR --interpolation-duration N

[exporter]
# Folder receiving the data pack; the pack is written to <datapack_folder>/<namespace>
# datapack_folder = "~/.minecraft/saves/world/datapacks"

# Ticks a display interpolates between two frames
# interpolation_duration = 1

# pack_format written to pack.mcmeta
# pack_format = 12
"#
        .to_string()
    }
}

fn parse_number(var: &str, value: &str) -> Result<u32, ApplicationError> {
    value.trim().parse().map_err(|e| ApplicationError::Config {
        message: format!("{var}: '{value}' is not a valid number: {e}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
