//! Fixed data pack scaffolding: metadata, hooks, load/tick, summon, remove,
//! variants and the per-animation control functions.

use serde_json::json;
use tracing::{debug, instrument};

use crate::application::compiler::CommandCompiler;
use crate::config::ExporterSettings;
use crate::domain::names::{objective, FUNCTION_EXT, META_FILE, NEW_TAG};
use crate::domain::{
    matrix_to_snbt, Animation, ArtifactNamer, DomainResult, ExportInput, LoopMode, Snbt,
    VariantSet,
};
use crate::infrastructure::vfs::VirtualFolder;

/// Entity type every bone and root display uses.
const DISPLAY_ENTITY: &str = "minecraft:item_display";

fn mcfunction(name: &str) -> String {
    format!("{}.{}", name, FUNCTION_EXT)
}

fn lines<const N: usize>(items: [String; N]) -> Vec<String> {
    items.into()
}

/// Assembles the complete data pack for one export in memory.
pub struct DatapackBuilder<'a> {
    input: &'a ExportInput,
    settings: &'a ExporterSettings,
    variants: VariantSet<'a>,
    names: ArtifactNamer,
}

impl<'a> DatapackBuilder<'a> {
    pub fn new(input: &'a ExportInput, settings: &'a ExporterSettings) -> DomainResult<Self> {
        Ok(Self {
            input,
            settings,
            variants: VariantSet::new(&input.variants)?,
            names: ArtifactNamer::new(&input.project.namespace),
        })
    }

    /// Builds every file. Fails before producing anything if any input is inconsistent.
    #[instrument(level = "debug", skip_all, fields(namespace = %self.names.namespace()))]
    pub fn build(&self) -> DomainResult<VirtualFolder> {
        let mut pack = VirtualFolder::new(self.names.namespace());
        self.metadata(&mut pack);
        self.tags(&mut pack);
        self.load_and_tick(&mut pack);
        self.summon(&mut pack)?;
        self.remove(&mut pack);
        self.apply_variants(&mut pack)?;
        self.animations(&mut pack)?;
        debug!("data pack holds {} entries", pack.child_count());
        Ok(pack)
    }

    fn public_functions<'f>(&self, pack: &'f mut VirtualFolder) -> &'f mut VirtualFolder {
        pack.new_folder(&format!("data/{}/functions", self.names.namespace()))
    }

    fn internal_functions<'f>(&self, pack: &'f mut VirtualFolder) -> &'f mut VirtualFolder {
        pack.new_folder(&format!("data/{}/functions", self.names.internal()))
    }

    fn metadata(&self, pack: &mut VirtualFolder) {
        let ns = self.names.namespace();
        pack.chain_new_file(META_FILE, json!({ "project_namespace": ns }))
            .chain_new_file(
                "pack.mcmeta",
                json!({
                    "pack": {
                        "pack_format": self.settings.pack_format,
                        "description": format!("\"{}\" A Data Pack generated by animpack.", ns),
                    }
                }),
            );
        pack.new_folder("data")
            .new_folders(&[ns, self.names.internal()]);
    }

    fn tags(&self, pack: &mut VirtualFolder) {
        let ns = self.names.namespace();
        pack.new_folder("data/minecraft/tags/functions")
            .chain_new_file(
                "load.json",
                json!({ "replace": false, "values": [self.names.internal_fn("load")] }),
            )
            .chain_new_file(
                "tick.json",
                json!({ "replace": false, "values": [self.names.internal_fn("tick")] }),
            );

        pack.new_folder(&format!("data/{}/tags/entity_types", ns))
            .chain_new_file(
                "aj_root.json",
                json!({ "replace": false, "values": [DISPLAY_ENTITY] }),
            )
            .chain_new_file(
                "aj_bone.json",
                json!({ "replace": false, "values": [DISPLAY_ENTITY] }),
            );

        let hooks = pack.new_folder(&format!("data/{}/tags/functions", ns));
        for hook in ["on_summon", "on_tick", "on_remove"] {
            hooks.new_file(
                format!("{}.json", hook),
                json!({ "replace": false, "values": [] }),
            );
        }
    }

    fn load_and_tick(&self, pack: &mut VirtualFolder) {
        let mut load: Vec<String> = objective::ALL
            .iter()
            .map(|o| format!("scoreboard objectives add {} dummy", o))
            .collect();
        load.push(format!("scoreboard players add .aj.last_id {} 0", objective::ID));
        load.push(format!(
            "scoreboard players set #aj.default_interpolation_duration {} {}",
            objective::I,
            self.settings.interpolation_duration
        ));
        for mode in LoopMode::ALL {
            load.push(format!(
                "scoreboard players set #aj.loop_mode.{} {} {}",
                mode.as_str(),
                objective::I,
                mode.index()
            ));
        }

        let names = &self.names;
        self.internal_functions(pack)
            .chain_new_file(mcfunction("load"), load)
            .chain_new_file(
                mcfunction("tick"),
                lines([format!(
                    "execute as @e[type={},tag={}] run function {}",
                    names.root_entity_type(),
                    names.root_tag(),
                    names.internal_fn("tick_as_root")
                )]),
            )
            .chain_new_file(
                mcfunction("tick_as_root"),
                lines([
                    format!("scoreboard players add @s {} 1", objective::LIFE_TIME),
                    format!("function {}", names.internal_fn("animations/tick")),
                    format!("function {}", names.tag_ref("on_tick")),
                ]),
            );
    }

    fn summon(&self, pack: &mut VirtualFolder) -> DomainResult<()> {
        let names = &self.names;
        let rig = &self.input.rig;

        // Range checked by the export service before building
        let interpolation_duration =
            i32::try_from(self.settings.interpolation_duration).unwrap_or(i32::MAX);

        let mut passengers = Vec::with_capacity(rig.bones.len());
        for bone in &rig.bones {
            let item = Snbt::compound()
                .set("id", Snbt::string(&self.input.project.rig_item))
                .set("Count", Snbt::Int(1))
                .set(
                    "tag",
                    Snbt::compound().set("CustomModelData", Snbt::Int(bone.custom_model_data)),
                );
            passengers.push(
                Snbt::compound()
                    .set("id", Snbt::string(DISPLAY_ENTITY))
                    .set(
                        "Tags",
                        Snbt::List(vec![
                            Snbt::string(NEW_TAG),
                            Snbt::string(names.bone_tag(&bone.name)),
                        ]),
                    )
                    .set("item", item)
                    .set("transformation", matrix_to_snbt(rig.default_pose_of(bone)?))
                    .set("interpolation_duration", Snbt::Int(interpolation_duration)),
            );
        }
        let summon_nbt = Snbt::compound()
            .set(
                "Tags",
                Snbt::List(vec![Snbt::string(NEW_TAG), Snbt::string(names.root_tag())]),
            )
            .set("Passengers", Snbt::List(passengers));

        let summon_internal = format!("function {}", names.internal_fn("summon"));
        let variant_id = |index: usize| {
            format!("scoreboard players set .aj.variant_id {} {}", objective::I, index)
        };

        let user_summon = self
            .public_functions(pack)
            .chain_new_file(
                mcfunction("summon"),
                lines([
                    variant_id(self.variants.default_index()),
                    summon_internal.clone(),
                ]),
            )
            .chain_new_file(
                mcfunction("summon_variable_variant"),
                lines([summon_internal.clone()]),
            )
            .new_folder("summon");
        for (index, variant) in self.variants.iter() {
            if variant.default {
                continue;
            }
            user_summon.new_file(
                mcfunction(&variant.name),
                lines([variant_id(index), summon_internal.clone()]),
            );
        }

        let mut as_root = vec![
            format!(
                "execute store result score @s {id} run scoreboard players add .aj.last_id {id} 1",
                id = objective::ID
            ),
            format!(
                "execute on passengers run function {}",
                names.internal_fn("summon/as_bone")
            ),
        ];
        for (index, variant) in self.variants.iter() {
            as_root.push(format!(
                "execute if score .aj.variant_id {} matches {} run function {}",
                objective::I,
                index,
                names.apply_variant_as_root_fn(&variant.name)
            ));
        }
        as_root.push(format!("tag @s remove {}", NEW_TAG));
        as_root.push(format!("function {}", names.tag_ref("on_summon")));

        self.internal_functions(pack)
            .chain_new_file(
                mcfunction("summon"),
                lines([
                    format!("summon {} ~ ~ ~ {}", DISPLAY_ENTITY, summon_nbt),
                    format!(
                        "execute as @e[type={},limit=1,distance=..1,tag={}] run function {}",
                        DISPLAY_ENTITY,
                        NEW_TAG,
                        names.internal_fn("summon/as_root")
                    ),
                ]),
            )
            .new_folder("summon")
            .chain_new_file(mcfunction("as_root"), as_root)
            .chain_new_file(
                mcfunction("as_bone"),
                lines([
                    format!(
                        "scoreboard players operation @s {id} = .aj.last_id {id}",
                        id = objective::ID
                    ),
                    format!("tag @s remove {}", NEW_TAG),
                ]),
            );
        Ok(())
    }

    /// Dispatch that runs `internal` when executed as the root and complains otherwise.
    fn root_only(&self, public_path: &str, internal: &str) -> Vec<String> {
        let root_tag = self.names.root_tag();
        lines([
            format!(
                "execute if entity @s[tag={}] run function {}",
                root_tag, internal
            ),
            format!(
                "execute if entity @s[tag=!{}] run tellraw @a {}",
                root_tag,
                must_run_as_root_message(&self.names.public_fn(public_path))
            ),
        ])
    }

    fn remove(&self, pack: &mut VirtualFolder) {
        let names = &self.names;
        let as_root = names.internal_fn("remove/as_root");
        let this = self.root_only("remove/this", &as_root);

        self.public_functions(pack)
            .new_folder("remove")
            .chain_new_file(mcfunction("this"), this)
            .chain_new_file(
                mcfunction("all"),
                lines([format!(
                    "execute as @e[type={},tag={}] run function {}",
                    names.root_entity_type(),
                    names.root_tag(),
                    as_root
                )]),
            );

        self.internal_functions(pack)
            .new_folder("remove")
            .chain_new_file(
                mcfunction("as_root"),
                lines([
                    format!("execute at @s run function {}", names.tag_ref("on_remove")),
                    "execute on passengers run kill @s".to_string(),
                    "kill @s".to_string(),
                ]),
            );
    }

    fn apply_variants(&self, pack: &mut VirtualFolder) -> DomainResult<()> {
        let names = &self.names;
        let rig = &self.input.rig;

        for (_, variant) in self.variants.iter() {
            let public = self.root_only(
                &format!("apply_variant/{}", variant.name),
                &names.apply_variant_as_root_fn(&variant.name),
            );
            self.public_functions(pack)
                .new_folder("apply_variant")
                .new_file(mcfunction(&variant.name), public);

            let mut as_bone = Vec::new();
            for bone in rig.bones.iter().filter(|b| variant.affects(&b.id)) {
                as_bone.push(format!(
                    "execute if entity @s[tag={}] run data modify entity @s item.tag.CustomModelData set value {}",
                    names.bone_tag(&bone.name),
                    rig.model_for(variant, bone)?
                ));
            }

            self.internal_functions(pack)
                .new_folder("apply_variant")
                .chain_new_file(
                    mcfunction(&format!("{}_as_root", variant.name)),
                    lines([format!(
                        "execute on passengers run function {}",
                        names.apply_variant_as_bone_fn(&variant.name)
                    )]),
                )
                .chain_new_file(mcfunction(&format!("{}_as_bone", variant.name)), as_bone);
        }
        Ok(())
    }

    fn animations(&self, pack: &mut VirtualFolder) -> DomainResult<()> {
        let names = &self.names;
        let animations = &self.input.animations;

        let tick = animations
            .iter()
            .map(|anim| {
                format!(
                    "execute if entity @s[tag={}] run function {}",
                    names.active_animation_tag(&anim.name),
                    names.internal_fn(&format!("animations/{}/tick", anim.name))
                )
            })
            .collect::<Vec<_>>();
        self.internal_functions(pack)
            .new_folder("animations")
            .new_file(mcfunction("tick"), tick);

        let compiler = CommandCompiler::new(names, &self.input.rig, &self.variants);
        for anim in animations {
            // Compile before touching the tree so a failing animation leaves nothing behind
            let compiled = compiler.compile(anim)?;
            self.animation_controls(pack, anim);

            let anim_folder = self
                .internal_functions(pack)
                .new_folder(&format!("animations/{}", anim.name));
            anim_folder
                .chain_new_file(
                    mcfunction("tick"),
                    lines([
                        format!(
                            "function {}",
                            names.internal_fn(&format!("animations/{}/apply_frame", anim.name))
                        ),
                        format!("scoreboard players add @s {} 1", objective::ANIM_TIME),
                        format!(
                            "execute if score @s {} matches {}.. run function {}",
                            objective::ANIM_TIME,
                            anim.duration,
                            names.internal_fn(&format!("animations/{}/end", anim.name))
                        ),
                    ]),
                )
                .chain_new_file(mcfunction("end"), self.end_lines(anim))
                .chain_new_file(mcfunction("apply_frame"), compiled.apply_frame);

            let tree = anim_folder.new_folder("tree");
            for unit in compiled.units {
                tree.new_file(mcfunction(&unit.name), unit.lines);
            }
        }
        Ok(())
    }

    fn end_lines(&self, anim: &Animation) -> Vec<String> {
        let public = |action: &str| {
            self.names
                .public_fn(&format!("animations/{}/{}", anim.name, action))
        };
        let when = |mode: LoopMode| {
            format!(
                "execute if score @s {} = #aj.loop_mode.{} {} run",
                objective::LOOP_MODE,
                mode.as_str(),
                objective::I
            )
        };
        lines([
            format!(
                "{} scoreboard players set @s {} 0",
                when(LoopMode::Loop),
                objective::ANIM_TIME
            ),
            format!("{} function {}", when(LoopMode::Once), public("stop")),
            format!("{} function {}", when(LoopMode::Hold), public("pause")),
        ])
    }

    /// User-facing play/resume/pause/stop functions of one animation.
    fn animation_controls(&self, pack: &mut VirtualFolder, anim: &Animation) {
        let active = self.names.active_animation_tag(&anim.name);
        let reset_time = format!("scoreboard players set @s {} 0", objective::ANIM_TIME);
        let set_loop_mode = format!(
            "scoreboard players set @s {} {}",
            objective::LOOP_MODE,
            anim.loop_mode.index()
        );
        let interpolation = format!(
            "execute on passengers store result entity @s interpolation_duration int 1 run scoreboard players get #aj.default_interpolation_duration {}",
            objective::I
        );
        let activate = format!("tag @s add {}", active);
        let deactivate = format!("tag @s remove {}", active);

        self.public_functions(pack)
            .new_folder(&format!("animations/{}", anim.name))
            .chain_new_file(
                mcfunction("play"),
                lines([
                    reset_time.clone(),
                    set_loop_mode.clone(),
                    interpolation.clone(),
                    activate.clone(),
                ]),
            )
            .chain_new_file(
                mcfunction("resume"),
                lines([set_loop_mode, interpolation, activate]),
            )
            .chain_new_file(mcfunction("pause"), lines([deactivate.clone()]))
            .chain_new_file(mcfunction("stop"), lines([reset_time, deactivate]));
    }
}

/// Raw JSON chat component reported when a root-only function runs on another entity.
fn must_run_as_root_message(function: &str) -> String {
    json!([
        "",
        { "text": "[" },
        { "text": "animpack", "color": "aqua" },
        { "text": "] " },
        { "text": "ERROR ☠", "color": "red" },
        { "text": " > ", "color": "gray" },
        [
            { "text": "The function", "color": "yellow" },
            { "text": format!(" {} ", function), "color": "blue" },
            { "text": "must be run" },
            { "text": " as ", "color": "red" },
            { "text": "the root entity!" }
        ]
    ])
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_function_name_when_building_root_warning_then_embeds_it() {
        let message = must_run_as_root_message("robot:remove/this");
        assert!(message.contains(" robot:remove/this "));
        assert!(message.starts_with("[\"\","));
    }
}
