//! Domain entities: rig, variants and rendered animations

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Row-major 4x4 affine transform of a bone, as rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform(pub [f32; 16]);

impl Transform {
    pub const IDENTITY: Transform = Transform([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);
}

/// What happens when an animation reaches its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    #[default]
    Loop,
    Once,
    Hold,
}

impl LoopMode {
    pub const ALL: [LoopMode; 3] = [LoopMode::Loop, LoopMode::Once, LoopMode::Hold];

    /// Score value the runtime stores in the loop-mode objective.
    pub fn index(self) -> u32 {
        match self {
            LoopMode::Loop => 0,
            LoopMode::Once => 1,
            LoopMode::Hold => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoopMode::Loop => "loop",
            LoopMode::Once => "once",
            LoopMode::Hold => "hold",
        }
    }
}

/// Raw commands attached to a keyframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCommands {
    /// Newline separated command text
    pub commands: String,
    /// Optional `execute` sub-command guarding the invocation (e.g. `if entity @s[tag=x]`)
    #[serde(default)]
    pub execute_condition: Option<String>,
}

/// Variant switch attached to a keyframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameVariantSwitch {
    /// Name of the variant to apply
    pub variant: String,
    #[serde(default)]
    pub execute_condition: Option<String>,
}

/// One baked frame of an animation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub index: u32,
    /// Bone id to transform. Bones missing from the map keep their previous transform.
    #[serde(default)]
    pub bones: BTreeMap<String, Transform>,
    #[serde(default)]
    pub commands: Option<FrameCommands>,
    #[serde(default)]
    pub variant: Option<FrameVariantSwitch>,
}

/// A rendered animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    /// Frame count
    pub duration: u32,
    #[serde(default)]
    pub loop_mode: LoopMode,
    pub frames: Vec<Frame>,
}

impl Animation {
    /// Checks that frame `i` carries index `i` and that the frame count matches the duration.
    pub fn validate_frames(&self) -> DomainResult<()> {
        if self.frames.len() != self.duration as usize {
            return Err(DomainError::FrameCountMismatch {
                animation: self.name.clone(),
                frames: self.frames.len(),
                duration: self.duration,
            });
        }
        for (position, frame) in self.frames.iter().enumerate() {
            if frame.index as usize != position {
                return Err(DomainError::FrameIndexMismatch {
                    animation: self.name.clone(),
                    position,
                    index: frame.index,
                });
            }
        }
        Ok(())
    }
}

/// A bone of the rig. Every bone becomes one display entity riding the root entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bone {
    pub id: String,
    pub name: String,
    pub custom_model_data: i32,
}

/// Model override of a bone for a non-default variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantBoneModel {
    pub custom_model_data: i32,
}

/// Rig description shared by all animations of a project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rig {
    /// Bones in export order
    pub bones: Vec<Bone>,
    /// Bone id to rest transform
    pub default_pose: BTreeMap<String, Transform>,
    /// Variant name to (bone id to model)
    #[serde(default)]
    pub variant_models: BTreeMap<String, BTreeMap<String, VariantBoneModel>>,
}

impl Rig {
    pub fn bone(&self, id: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.id == id)
    }

    pub fn default_pose_of(&self, bone: &Bone) -> DomainResult<&Transform> {
        self.default_pose
            .get(&bone.id)
            .ok_or_else(|| DomainError::MissingDefaultPose(bone.name.clone()))
    }

    /// Custom model data a bone shows while `variant` is applied.
    pub fn model_for(&self, variant: &Variant, bone: &Bone) -> DomainResult<i32> {
        if variant.default {
            return Ok(bone.custom_model_data);
        }
        self.variant_models
            .get(&variant.name)
            .and_then(|models| models.get(&bone.id))
            .map(|m| m.custom_model_data)
            .ok_or_else(|| DomainError::MissingVariantModel {
                variant: variant.name.clone(),
                bone: bone.name.clone(),
            })
    }
}

/// Alternative set of bone models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub default: bool,
    /// Bone ids listed by the user
    #[serde(default)]
    pub affected_bones: Vec<String>,
    /// `true`: only listed bones are affected, `false`: listed bones are excluded
    #[serde(default)]
    pub affected_bones_is_a_whitelist: bool,
}

impl Variant {
    pub fn affects(&self, bone_id: &str) -> bool {
        let listed = self.affected_bones.iter().any(|b| b == bone_id);
        listed == self.affected_bones_is_a_whitelist
    }
}

/// Ordered variant list with exactly one default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet<'a> {
    variants: &'a [Variant],
    default_index: usize,
}

impl<'a> VariantSet<'a> {
    pub fn new(variants: &'a [Variant]) -> DomainResult<Self> {
        if let Some(name) = variants.iter().map(|v| &v.name).duplicates().next() {
            return Err(DomainError::DuplicateVariant(name.clone()));
        }

        let defaults: Vec<usize> = variants
            .iter()
            .enumerate()
            .filter(|(_, v)| v.default)
            .map(|(i, _)| i)
            .collect();
        match defaults.as_slice() {
            [] => Err(DomainError::MissingDefaultVariant),
            [index] => Ok(Self {
                variants,
                default_index: *index,
            }),
            many => Err(DomainError::MultipleDefaultVariants(
                many.iter().map(|&i| variants[i].name.as_str()).join(", "),
            )),
        }
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn get(&self, name: &str) -> Option<&'a Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Variant)> {
        self.variants.iter().enumerate()
    }
}

/// Project-level settings carried by the project document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Data pack namespace, e.g. `my_rig`
    pub namespace: String,
    /// Item used by every bone display, e.g. `minecraft:white_dye`
    pub rig_item: String,
}

/// Everything the host hands to an export: project settings, rig, variants and animations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportInput {
    pub project: ProjectSettings,
    pub rig: Rig,
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub animations: Vec<Animation>,
}
