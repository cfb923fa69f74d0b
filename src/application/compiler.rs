//! Command compiler: turns an animation's frame tree into function units.
//!
//! Branches emit range dispatch lines, leaves emit a root unit (run by the
//! entity holding the time score) and a bone unit (run by every passenger).

use tracing::{debug, instrument, trace};

use crate::domain::names::{self, objective};
use crate::domain::{
    build_frame_tree, matrix_to_snbt, Animation, ArtifactNamer, DomainError, DomainResult,
    Frame, FrameTreeNode, Rig, Snbt, VariantSet,
};

/// A named function file: a flat list of commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandUnit {
    pub name: String,
    pub lines: Vec<String>,
}

impl CommandUnit {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }
}

/// Output of compiling one animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledAnimation {
    /// Lines of the `apply_frame` unit: the dispatch into the tree root
    pub apply_frame: Vec<String>,
    /// Tree units, placed in the animation's `tree` folder
    pub units: Vec<CommandUnit>,
}

pub struct CommandCompiler<'a> {
    names: &'a ArtifactNamer,
    rig: &'a Rig,
    variants: &'a VariantSet<'a>,
}

impl<'a> CommandCompiler<'a> {
    pub fn new(names: &'a ArtifactNamer, rig: &'a Rig, variants: &'a VariantSet<'a>) -> Self {
        Self {
            names,
            rig,
            variants,
        }
    }

    /// Builds the search tree over the animation's frames and compiles it.
    ///
    /// Either every unit of the animation is returned or none is.
    #[instrument(level = "debug", skip_all, fields(animation = %animation.name))]
    pub fn compile(&self, animation: &Animation) -> DomainResult<CompiledAnimation> {
        animation.validate_frames()?;
        let tree = build_frame_tree(&animation.frames)?;
        let compiled = self.compile_tree(&animation.name, &tree)?;
        debug!(
            "compiled {} units over {} frames",
            compiled.units.len(),
            animation.frames.len()
        );
        Ok(compiled)
    }

    pub fn compile_tree(
        &self,
        animation: &str,
        tree: &FrameTreeNode<&Frame>,
    ) -> DomainResult<CompiledAnimation> {
        let mut units = Vec::new();
        let entry = self.compile_node(animation, tree, &mut units)?;
        Ok(CompiledAnimation {
            apply_frame: vec![entry],
            units,
        })
    }

    /// Emits the units of `node` and returns the line dispatching into it.
    fn compile_node(
        &self,
        animation: &str,
        node: &FrameTreeNode<&Frame>,
        units: &mut Vec<CommandUnit>,
    ) -> DomainResult<String> {
        match node {
            FrameTreeNode::Branch { children, .. } => {
                let mut lines = Vec::with_capacity(children.len());
                for child in children {
                    lines.push(self.compile_node(animation, child, units)?);
                }
                units.push(CommandUnit::new(names::node_unit_name(node), lines));
            }
            FrameTreeNode::Leaf { index, item } => {
                let bone_lines = self.bone_leaf(animation, *index, item)?;
                let root_lines = self.root_leaf(animation, *index, item, units)?;
                units.push(CommandUnit::new(names::root_leaf_unit(*index), root_lines));
                units.push(CommandUnit::new(names::bone_leaf_unit(*index), bone_lines));
            }
        }
        Ok(self.dispatch_line(animation, node))
    }

    /// `execute if score @s <time> matches <range> run function <unit>`
    pub fn dispatch_line<T>(&self, animation: &str, node: &FrameTreeNode<T>) -> String {
        format!(
            "execute if score @s {} matches {} run function {}",
            objective::ANIM_TIME,
            names::score_range(node),
            self.names
                .tree_fn(animation, &names::node_unit_name(node))
        )
    }

    fn root_leaf(
        &self,
        animation: &str,
        index: u32,
        frame: &Frame,
        units: &mut Vec<CommandUnit>,
    ) -> DomainResult<Vec<String>> {
        let mut lines = vec![format!(
            "execute on passengers run function {}",
            self.names
                .tree_fn(animation, &names::bone_leaf_unit(index))
        )];

        if let Some(commands) = &frame.commands {
            let unit = names::commands_leaf_unit(index);
            let call = format!("function {}", self.names.tree_fn(animation, &unit));
            lines.push(guarded(commands.execute_condition.as_deref(), call));
            units.push(CommandUnit::new(
                unit,
                commands.commands.lines().map(str::to_string).collect(),
            ));
        }

        if let Some(switch) = &frame.variant {
            let variant =
                self.variants
                    .get(&switch.variant)
                    .ok_or_else(|| DomainError::UnknownVariant {
                        animation: animation.to_string(),
                        frame: index,
                        variant: switch.variant.clone(),
                    })?;
            let call = format!(
                "function {}",
                self.names.apply_variant_as_root_fn(&variant.name)
            );
            lines.push(guarded(switch.execute_condition.as_deref(), call));
        }

        Ok(lines)
    }

    fn bone_leaf(&self, animation: &str, index: u32, frame: &Frame) -> DomainResult<Vec<String>> {
        if let Some(unknown) = frame.bones.keys().find(|id| self.rig.bone(id).is_none()) {
            return Err(DomainError::UnknownBone {
                animation: animation.to_string(),
                frame: index,
                bone: unknown.to_string(),
            });
        }

        let mut lines = Vec::with_capacity(frame.bones.len());
        for bone in &self.rig.bones {
            let Some(matrix) = frame.bones.get(&bone.id) else {
                trace!(frame = index, bone = %bone.name, "bone not keyed");
                continue;
            };
            let data = Snbt::compound()
                .set("transformation", matrix_to_snbt(matrix))
                .set("start_interpolation", Snbt::Int(0));
            lines.push(format!(
                "execute if entity @s[tag={}] run data modify entity @s {{}} merge value {}",
                self.names.bone_tag(&bone.name),
                data
            ));
        }
        Ok(lines)
    }
}

/// Wraps `command` in `execute <condition> run` when a condition is present.
fn guarded(condition: Option<&str>, command: String) -> String {
    match condition.map(str::trim).filter(|c| !c.is_empty()) {
        Some(condition) => format!("execute {} run {}", condition, command),
        None => command,
    }
}
