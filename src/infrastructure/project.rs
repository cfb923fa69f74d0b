//! Project document loading

use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::ExportInput;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

/// Reads and deserializes a JSON project document.
#[instrument(level = "debug", skip(fs))]
pub fn load_project(fs: &dyn FileSystem, path: &Path) -> InfraResult<ExportInput> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read project {}", path.display()), e))?;
    let input = parse_project(&content).map_err(|e| InfraError::ProjectFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    debug!(
        "project '{}': {} bones, {} variants, {} animations",
        input.project.namespace,
        input.rig.bones.len(),
        input.variants.len(),
        input.animations.len()
    );
    Ok(input)
}

pub fn parse_project(content: &str) -> serde_json::Result<ExportInput> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_minimal_document_when_parsing_then_animations_default_to_empty() {
        let input = parse_project(
            r#"{
                "project": { "namespace": "robot", "rig_item": "minecraft:white_dye" },
                "rig": { "bones": [], "default_pose": {}, "variant_models": {} },
                "variants": [
                    { "name": "default", "default": true, "affected_bones": [], "affected_bones_is_a_whitelist": false }
                ]
            }"#,
        )
        .expect("valid document");
        assert_eq!(input.project.namespace, "robot");
        assert!(input.animations.is_empty());
    }

    #[test]
    fn given_missing_project_section_when_parsing_then_fails() {
        assert!(parse_project(r#"{ "rig": {} }"#).is_err());
    }
}
