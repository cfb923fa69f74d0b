//! Deterministic names for generated functions, tags and objectives.
//!
//! Generated functions never point at each other structurally: every
//! cross-reference is a `namespace:path` string built here.

use crate::domain::frame_tree::FrameTreeNode;

/// Scoreboard objectives used by the runtime.
pub mod objective {
    pub const I: &str = "aj.i";
    pub const ID: &str = "aj.id";
    pub const ANIM_TIME: &str = "aj.anim_time";
    pub const LIFE_TIME: &str = "aj.life_time";
    pub const LOOP_MODE: &str = "aj.loop_mode";

    pub const ALL: [&str; 5] = [I, ID, ANIM_TIME, LIFE_TIME, LOOP_MODE];
}

/// Tag carried by freshly summoned entities until their setup ran.
pub const NEW_TAG: &str = "aj.new";

/// Metadata file recording which namespace owns an exported data pack.
pub const META_FILE: &str = "animated_java.mcmeta";

/// Function file extension.
pub const FUNCTION_EXT: &str = "mcfunction";

/// Name of the function unit emitted for a tree node.
pub fn node_unit_name<T>(node: &FrameTreeNode<T>) -> String {
    match node {
        FrameTreeNode::Leaf { index, .. } => root_leaf_unit(*index),
        FrameTreeNode::Branch { min, max, .. } => branch_unit(*min, *max),
    }
}

pub fn branch_unit(min: u32, max: u32) -> String {
    format!("branch_{}_{}", min, max)
}

pub fn root_leaf_unit(index: u32) -> String {
    format!("leaf_{}", index)
}

pub fn bone_leaf_unit(index: u32) -> String {
    format!("leaf_{}_as_bone", index)
}

pub fn commands_leaf_unit(index: u32) -> String {
    format!("leaf_{}_commands", index)
}

/// `matches` argument selecting the range a node covers.
pub fn score_range<T>(node: &FrameTreeNode<T>) -> String {
    match node {
        FrameTreeNode::Leaf { index, .. } => index.to_string(),
        FrameTreeNode::Branch { min, max, .. } => format!("{}..{}", min, max),
    }
}

/// Names derived from the project namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNamer {
    namespace: String,
    internal: String,
}

impl ArtifactNamer {
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let internal = format!("zzz_{}_internal", namespace);
        Self {
            namespace,
            internal,
        }
    }

    /// User-facing namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Namespace holding generated internals.
    pub fn internal(&self) -> &str {
        &self.internal
    }

    /// `internal:path`
    pub fn internal_fn(&self, path: &str) -> String {
        format!("{}:{}", self.internal, path)
    }

    /// `namespace:path`
    pub fn public_fn(&self, path: &str) -> String {
        format!("{}:{}", self.namespace, path)
    }

    /// `#namespace:tag`
    pub fn tag_ref(&self, tag: &str) -> String {
        format!("#{}:{}", self.namespace, tag)
    }

    pub fn root_entity_type(&self) -> String {
        self.tag_ref("aj_root")
    }

    pub fn root_tag(&self) -> String {
        format!("aj.{}.root", self.namespace)
    }

    pub fn bone_tag(&self, bone_name: &str) -> String {
        format!("aj.{}.bone.{}", self.namespace, bone_name)
    }

    pub fn active_animation_tag(&self, animation: &str) -> String {
        format!("aj.{}.animations.{}", self.namespace, animation)
    }

    /// Folder (relative to `functions/`) holding an animation's tree units.
    pub fn tree_folder(&self, animation: &str) -> String {
        format!("animations/{}/tree", animation)
    }

    /// Fully qualified reference to a unit of an animation's tree.
    pub fn tree_fn(&self, animation: &str, unit: &str) -> String {
        self.internal_fn(&format!("{}/{}", self.tree_folder(animation), unit))
    }

    pub fn apply_variant_as_root_fn(&self, variant: &str) -> String {
        self.internal_fn(&format!("apply_variant/{}_as_root", variant))
    }

    pub fn apply_variant_as_bone_fn(&self, variant: &str) -> String {
        self.internal_fn(&format!("apply_variant/{}_as_bone", variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::build_index_tree;
    use std::collections::HashSet;

    #[test]
    fn given_namespace_when_naming_then_internal_namespace_sorts_last() {
        let names = ArtifactNamer::new("robot");
        assert_eq!(names.internal(), "zzz_robot_internal");
        assert_eq!(
            names.tree_fn("walk", &branch_unit(0, 4)),
            "zzz_robot_internal:animations/walk/tree/branch_0_4"
        );
        assert_eq!(names.bone_tag("head"), "aj.robot.bone.head");
    }

    #[test]
    fn given_large_tree_when_naming_every_unit_then_names_are_unique() {
        let tree = build_index_tree(97).unwrap();
        let mut seen = HashSet::new();
        for node in tree.iter() {
            assert!(seen.insert(node_unit_name(node)), "duplicate {}", node);
            if let FrameTreeNode::Leaf { index, .. } = node {
                assert!(seen.insert(bone_leaf_unit(*index)));
                assert!(seen.insert(commands_leaf_unit(*index)));
            }
        }
        assert_eq!(seen.len(), 96 + 3 * 97);
    }
}
