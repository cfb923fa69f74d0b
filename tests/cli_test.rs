//! Tests for command dispatch

use clap::Parser;
use serde_json::json;
use tempfile::TempDir;

use animpack::cli::args::Cli;
use animpack::cli::commands::execute_command;

fn write_project(dir: &std::path::Path) -> std::path::PathBuf {
    let identity = json!([1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
    let path = dir.join("robot.json");
    let doc = json!({
        "project": { "namespace": "robot", "rig_item": "minecraft:white_dye" },
        "rig": {
            "bones": [{ "id": "b1", "name": "body", "custom_model_data": 1 }],
            "default_pose": { "b1": identity }
        },
        "variants": [{ "name": "default", "default": true }],
        "animations": [{
            "name": "idle",
            "duration": 2,
            "frames": [
                { "index": 0, "bones": { "b1": identity } },
                { "index": 1 }
            ]
        }]
    });
    std::fs::write(&path, doc.to_string()).unwrap();
    path
}

#[test]
fn given_export_command_when_executed_then_writes_pack_to_output() {
    let temp = TempDir::new().unwrap();
    let project = write_project(temp.path());
    let out = temp.path().join("datapacks");
    let cli = Cli::parse_from([
        "animpack",
        "-C",
        temp.path().to_str().unwrap(),
        "export",
        project.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--interpolation-duration",
        "2",
    ]);

    execute_command(&cli).unwrap();

    let load = std::fs::read_to_string(
        out.join("robot/data/zzz_robot_internal/functions/load.mcfunction"),
    )
    .unwrap();
    assert!(load.contains("scoreboard players set #aj.default_interpolation_duration aj.i 2"));
}

#[test]
fn given_missing_project_file_when_export_then_io_exit_code() {
    let temp = TempDir::new().unwrap();
    let cli = Cli::parse_from([
        "animpack",
        "export",
        temp.path().join("absent.json").to_str().unwrap(),
        "-o",
        temp.path().to_str().unwrap(),
    ]);

    let err = execute_command(&cli).unwrap_err();
    assert_eq!(err.exit_code(), animpack::exitcode::IOERR);
}

#[test]
fn given_zero_frames_when_tree_then_data_error() {
    let cli = Cli::parse_from(["animpack", "tree", "0"]);
    let err = execute_command(&cli).unwrap_err();
    assert_eq!(err.exit_code(), animpack::exitcode::DATAERR);
}

#[test]
fn given_no_command_when_executed_then_usage_error() {
    let cli = Cli::parse_from(["animpack"]);
    let err = execute_command(&cli).unwrap_err();
    assert_eq!(err.exit_code(), animpack::exitcode::USAGE);
}
