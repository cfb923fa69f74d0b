//! Integration tests for Settings config loading.
//!
//! These tests run without a global config (temp directories only), so they
//! exercise local config merging on top of the compiled defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use animpack::application::ApplicationError;
use animpack::config::{local_config_path, Settings};

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(".animpack.toml"),
        r#"
[exporter]
datapack_folder = "/srv/world/datapacks"
interpolation_duration = 3
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(
        settings.exporter.datapack_folder,
        PathBuf::from("/srv/world/datapacks")
    );
    assert_eq!(settings.exporter.interpolation_duration, 3);
}

#[test]
fn given_no_local_config_when_load_then_datapack_folder_is_empty() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(settings.exporter.datapack_folder.as_os_str().is_empty());
    assert_eq!(settings.exporter.interpolation_duration, 1);
}

#[test]
fn given_broken_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[exporter]\ninterpolation_duration = \"fast\"\n",
    )
    .unwrap();

    let err = Settings::load(Some(project.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains(".animpack.toml"));
}

#[test]
fn given_env_override_when_load_then_env_wins_over_local_config() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[exporter]\npack_format = 10\n",
    )
    .unwrap();

    std::env::set_var("ANIMPACK_EXPORTER__PACK_FORMAT", "15");
    let settings = Settings::load(Some(project.path()));
    std::env::remove_var("ANIMPACK_EXPORTER__PACK_FORMAT");

    assert_eq!(settings.expect("load settings").exporter.pack_format, 15);
}

#[test]
fn given_settings_when_to_toml_then_round_trips() {
    let mut settings = Settings::default();
    settings.exporter.datapack_folder = PathBuf::from("/packs");

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert!(text.contains("[exporter]"));
    assert_eq!(parsed, settings);
}
