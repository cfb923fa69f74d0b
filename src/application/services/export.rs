//! Export service
//!
//! Validates the export input, builds the data pack in memory, reconciles
//! the destination folder and writes the pack to disk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use itertools::Itertools;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::application::scaffold::DatapackBuilder;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::ExporterSettings;
use crate::domain::names::META_FILE;
use crate::domain::{DomainError, ExportInput};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::vfs::VirtualFolder;

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// `<datapack_folder>/<namespace>`
    pub path: PathBuf,
    pub animations: usize,
    /// Files and folders written
    pub written: usize,
}

/// Names that end up as resource path segments and tag suffixes.
fn resource_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9_.-]+$").expect("valid resource name regex"))
}

fn is_resource_name(name: &str) -> bool {
    resource_name_pattern().is_match(name) && name != "." && name != ".."
}

fn check_name(kind: &'static str, name: &str) -> Result<(), DomainError> {
    if is_resource_name(name) {
        Ok(())
    } else {
        Err(DomainError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Export service.
pub struct ExportService {
    fs: Arc<dyn FileSystem>,
    settings: ExporterSettings,
}

impl ExportService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: ExporterSettings) -> Self {
        Self { fs, settings }
    }

    /// Exports `input` into `<datapack_folder>/<namespace>`.
    ///
    /// `on_written` receives the number of entries written since the previous call.
    #[instrument(level = "debug", skip_all, fields(namespace = %input.project.namespace))]
    pub fn export(
        &self,
        input: &ExportInput,
        on_written: &mut dyn FnMut(usize),
    ) -> ApplicationResult<ExportReport> {
        let pack = self.build(input)?;
        let export_dir = self.settings.datapack_folder.join(pack.name());

        self.reconcile(&export_dir, &input.project.namespace)?;

        let mut written = 0;
        let total = pack.child_count();
        pack.write_to_disk(self.fs.as_ref(), &self.settings.datapack_folder, &mut |n| {
            written += n;
            on_written(n);
        })
        .with_path_context("write data pack", &export_dir)?;
        info!("wrote {} of {} entries to {}", written, total, export_dir.display());

        Ok(ExportReport {
            path: export_dir,
            animations: input.animations.len(),
            written,
        })
    }

    /// Validates `input` and assembles the data pack without touching the disk.
    pub fn build(&self, input: &ExportInput) -> ApplicationResult<VirtualFolder> {
        self.validate(input)?;
        let builder = DatapackBuilder::new(input, &self.settings)?;
        Ok(builder.build()?)
    }

    fn validate(&self, input: &ExportInput) -> ApplicationResult<()> {
        if self.settings.datapack_folder.as_os_str().is_empty() {
            return Err(ApplicationError::config(
                "no datapack folder configured (exporter.datapack_folder)",
            ));
        }
        let namespace = &input.project.namespace;
        if !is_resource_name(namespace) {
            return Err(ApplicationError::config(format!(
                "invalid namespace '{}': only [a-z0-9_.-] are allowed",
                namespace
            )));
        }
        if input.project.rig_item.trim().is_empty() {
            return Err(ApplicationError::config("no rig item configured"));
        }
        if i32::try_from(self.settings.interpolation_duration).is_err() {
            return Err(ApplicationError::config(format!(
                "interpolation duration {} exceeds {} ticks",
                self.settings.interpolation_duration,
                i32::MAX
            )));
        }

        if let Some(anim) = input.animations.iter().find(|a| a.duration == 0) {
            return Err(ApplicationError::config(format!(
                "animation '{}' has zero length",
                anim.name
            )));
        }
        for anim in &input.animations {
            check_name("animation", &anim.name)?;
        }
        for variant in &input.variants {
            check_name("variant", &variant.name)?;
        }
        for bone in &input.rig.bones {
            check_name("bone", &bone.name)?;
        }
        if let Some(name) = input.animations.iter().map(|a| &a.name).duplicates().next() {
            return Err(DomainError::DuplicateAnimation(name.clone()).into());
        }
        if input.animations.is_empty() {
            warn!("exporting a rig without animations");
        }
        Ok(())
    }

    /// Clears a previous export of the same namespace.
    ///
    /// Nothing is deleted when the folder holds a pack of another namespace.
    fn reconcile(&self, export_dir: &Path, namespace: &str) -> ApplicationResult<()> {
        let meta_path = export_dir.join(META_FILE);
        if !self.fs.exists(&meta_path) {
            debug!("no previous export at {}", export_dir.display());
            return Ok(());
        }

        let content = self
            .fs
            .read_to_string(&meta_path)
            .with_path_context("read export metadata", &meta_path)?;
        let meta: Value =
            serde_json::from_str(&content).map_err(|e| ApplicationError::OperationFailed {
                context: format!("parse export metadata: {}", meta_path.display()),
                source: Box::new(e),
            })?;
        let found = meta
            .get("project_namespace")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if found != namespace {
            return Err(ApplicationError::NamespaceConflict {
                path: export_dir.to_path_buf(),
                found: found.to_string(),
                expected: namespace.to_string(),
            });
        }

        debug!("removing previous export {}", export_dir.display());
        self.fs
            .remove_dir_all(export_dir)
            .with_path_context("remove previous export", export_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_names_when_matching_then_only_lowercase_path_segments_pass() {
        assert!(is_resource_name("my_rig.v2-a"));
        assert!(!is_resource_name("MyRig"));
        assert!(!is_resource_name("my rig"));
        assert!(!is_resource_name(""));
        assert!(!is_resource_name("red/dark"));
        assert!(!is_resource_name("."));
        assert!(!is_resource_name(".."));
    }

    #[test]
    fn given_invalid_name_when_checking_then_error_names_entry() {
        assert_eq!(
            check_name("variant", "red/dark").unwrap_err(),
            DomainError::InvalidName {
                kind: "variant",
                name: "red/dark".to_string()
            }
        );
        assert!(check_name("bone", "left_arm").is_ok());
    }
}
