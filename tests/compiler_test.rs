//! Tests for the command compiler

use std::collections::BTreeMap;

use animpack::application::CommandCompiler;
use animpack::domain::{
    Animation, ArtifactNamer, Bone, DomainError, Frame, FrameCommands, FrameVariantSwitch,
    LoopMode, Rig, Transform, Variant, VariantSet,
};
use animpack::util::testing;

const IDENTITY_SNBT: &str = "[1f,0f,0f,0f,0f,1f,0f,0f,0f,0f,1f,0f,0f,0f,0f,1f]";

fn rig() -> Rig {
    let bones = vec![
        Bone {
            id: "b-body".into(),
            name: "body".into(),
            custom_model_data: 1,
        },
        Bone {
            id: "b-head".into(),
            name: "head".into(),
            custom_model_data: 2,
        },
    ];
    let default_pose = bones
        .iter()
        .map(|b| (b.id.clone(), Transform::IDENTITY))
        .collect();
    Rig {
        bones,
        default_pose,
        variant_models: BTreeMap::new(),
    }
}

fn variants() -> Vec<Variant> {
    vec![
        Variant {
            name: "default".into(),
            default: true,
            affected_bones: vec![],
            affected_bones_is_a_whitelist: false,
        },
        Variant {
            name: "red".into(),
            default: false,
            affected_bones: vec!["b-head".into()],
            affected_bones_is_a_whitelist: true,
        },
    ]
}

fn frame(index: u32, bones: &[&str]) -> Frame {
    Frame {
        index,
        bones: bones
            .iter()
            .map(|id| (id.to_string(), Transform::IDENTITY))
            .collect(),
        ..Default::default()
    }
}

fn animation(name: &str, frames: Vec<Frame>) -> Animation {
    Animation {
        name: name.into(),
        duration: frames.len() as u32,
        loop_mode: LoopMode::Loop,
        frames,
    }
}

fn unit<'a>(compiled: &'a animpack::application::CompiledAnimation, name: &str) -> &'a [String] {
    &compiled
        .units
        .iter()
        .find(|u| u.name == name)
        .unwrap_or_else(|| panic!("missing unit {}", name))
        .lines
}

#[test]
fn given_walk_animation_when_compiling_then_emits_dispatch_per_node() {
    testing::init_test_setup();
    let (rig, variants) = (rig(), variants());
    let names = ArtifactNamer::new("robot");
    let set = VariantSet::new(&variants).unwrap();
    let compiler = CommandCompiler::new(&names, &rig, &set);
    let walk = animation("walk", (0..5).map(|i| frame(i, &["b-body"])).collect());

    let compiled = compiler.compile(&walk).unwrap();

    assert_eq!(
        compiled.apply_frame,
        vec!["execute if score @s aj.anim_time matches 0..4 run function zzz_robot_internal:animations/walk/tree/branch_0_4"]
    );
    assert_eq!(
        unit(&compiled, "branch_0_2"),
        &[
            "execute if score @s aj.anim_time matches 0..1 run function zzz_robot_internal:animations/walk/tree/branch_0_1",
            "execute if score @s aj.anim_time matches 2 run function zzz_robot_internal:animations/walk/tree/leaf_2",
        ]
    );
    // 4 branches + 5 root leaves + 5 bone leaves
    assert_eq!(compiled.units.len(), 14);
    assert_eq!(
        unit(&compiled, "leaf_3"),
        &["execute on passengers run function zzz_robot_internal:animations/walk/tree/leaf_3_as_bone"]
    );
}

#[test]
fn given_sparse_frame_when_compiling_then_bone_unit_covers_present_bones_only() {
    let (rig, variants) = (rig(), variants());
    let names = ArtifactNamer::new("robot");
    let set = VariantSet::new(&variants).unwrap();
    let compiler = CommandCompiler::new(&names, &rig, &set);
    let anim = animation(
        "nod",
        vec![frame(0, &["b-body", "b-head"]), frame(1, &["b-head"]), frame(2, &[])],
    );

    let compiled = compiler.compile(&anim).unwrap();

    assert_eq!(
        unit(&compiled, "leaf_0_as_bone"),
        &[
            format!("execute if entity @s[tag=aj.robot.bone.body] run data modify entity @s {{}} merge value {{transformation:{},start_interpolation:0}}", IDENTITY_SNBT),
            format!("execute if entity @s[tag=aj.robot.bone.head] run data modify entity @s {{}} merge value {{transformation:{},start_interpolation:0}}", IDENTITY_SNBT),
        ]
    );
    assert_eq!(unit(&compiled, "leaf_1_as_bone").len(), 1);
    assert!(unit(&compiled, "leaf_1_as_bone")[0].contains("aj.robot.bone.head"));
    assert!(unit(&compiled, "leaf_2_as_bone").is_empty());
}

#[test]
fn given_same_input_when_compiling_twice_then_output_is_identical() {
    let (rig, variants) = (rig(), variants());
    let names = ArtifactNamer::new("robot");
    let set = VariantSet::new(&variants).unwrap();
    let compiler = CommandCompiler::new(&names, &rig, &set);
    let anim = animation("idle", (0..23).map(|i| frame(i, &["b-body", "b-head"])).collect());

    assert_eq!(compiler.compile(&anim).unwrap(), compiler.compile(&anim).unwrap());
}

#[test]
fn given_commands_and_variant_switch_when_compiling_then_leaf_invokes_them() {
    let (rig, variants) = (rig(), variants());
    let names = ArtifactNamer::new("robot");
    let set = VariantSet::new(&variants).unwrap();
    let compiler = CommandCompiler::new(&names, &rig, &set);
    let mut keyed = frame(1, &["b-body"]);
    keyed.commands = Some(FrameCommands {
        commands: "say hi\nparticle flame ~ ~ ~".into(),
        execute_condition: Some("if entity @s[tag=loud]".into()),
    });
    keyed.variant = Some(FrameVariantSwitch {
        variant: "red".into(),
        execute_condition: None,
    });
    let anim = animation("wave", vec![frame(0, &[]), keyed]);

    let compiled = compiler.compile(&anim).unwrap();

    assert_eq!(
        unit(&compiled, "leaf_1"),
        &[
            "execute on passengers run function zzz_robot_internal:animations/wave/tree/leaf_1_as_bone",
            "execute if entity @s[tag=loud] run function zzz_robot_internal:animations/wave/tree/leaf_1_commands",
            "function zzz_robot_internal:apply_variant/red_as_root",
        ]
    );
    assert_eq!(
        unit(&compiled, "leaf_1_commands"),
        &["say hi", "particle flame ~ ~ ~"]
    );
}

#[test]
fn given_unknown_variant_when_compiling_then_fails_without_output() {
    let (rig, variants) = (rig(), variants());
    let names = ArtifactNamer::new("robot");
    let set = VariantSet::new(&variants).unwrap();
    let compiler = CommandCompiler::new(&names, &rig, &set);
    let mut bad = frame(2, &[]);
    bad.variant = Some(FrameVariantSwitch {
        variant: "ghost".into(),
        execute_condition: None,
    });
    let anim = animation("spin", vec![frame(0, &[]), frame(1, &[]), bad]);

    let err = compiler.compile(&anim).unwrap_err();

    assert_eq!(
        err,
        DomainError::UnknownVariant {
            animation: "spin".into(),
            frame: 2,
            variant: "ghost".into(),
        }
    );
}

#[test]
fn given_bone_missing_from_rig_when_compiling_then_unknown_bone() {
    let (rig, variants) = (rig(), variants());
    let names = ArtifactNamer::new("robot");
    let set = VariantSet::new(&variants).unwrap();
    let compiler = CommandCompiler::new(&names, &rig, &set);
    let anim = animation("tail", vec![frame(0, &["b-tail"])]);

    assert!(matches!(
        compiler.compile(&anim),
        Err(DomainError::UnknownBone { ref bone, .. }) if bone == "b-tail"
    ));
}

#[test]
fn given_misnumbered_frames_when_compiling_then_frame_index_mismatch() {
    let (rig, variants) = (rig(), variants());
    let names = ArtifactNamer::new("robot");
    let set = VariantSet::new(&variants).unwrap();
    let compiler = CommandCompiler::new(&names, &rig, &set);
    let anim = animation("skip", vec![frame(0, &[]), frame(2, &[])]);

    assert!(matches!(
        compiler.compile(&anim),
        Err(DomainError::FrameIndexMismatch { position: 1, index: 2, .. })
    ));
}
