//! Configuration loading from disk and from `XPOST_CONFIG`

use std::fs;

use libxpost::compose::CountStrategy;
use libxpost::config::{resolve_config_path, Config};
use libxpost::error::ConfigError;
use libxpost::service::ComposeService;
use libxpost::XpostError;
use serial_test::serial;
use tempfile::TempDir;

const VALID: &str = r#"
[defaults]
draft = false
platforms = ["bluesky"]
counting = "code_points"

[[platforms]]
name = "mastodon"
char_limit = 500

[[platforms]]
name = "bluesky"
char_limit = 300

[modes.release]
label = "Release"
platforms = ["mastodon", "bluesky"]

[modes.release.prefixes]
mastodon = "Released: "

[attachments]
draft_image_base = "https://cdn.example/drafts"
"#;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_from_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, VALID);

    let config = Config::load_from_path(&path).unwrap();
    assert!(!config.defaults.draft);
    assert_eq!(config.defaults.platforms, vec!["bluesky"]);
    assert_eq!(config.defaults.counting, CountStrategy::CodePoints);
    assert_eq!(config.platforms.len(), 2);
    assert_eq!(config.attachments.draft_image_base, "https://cdn.example/drafts");
    assert_eq!(
        config.modes["release"].prefixes.get("mastodon").map(String::as_str),
        Some("Released: ")
    );
}

#[test]
fn test_missing_file_is_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load_from_path(&temp_dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, XpostError::Config(ConfigError::ReadError(_))));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[[platforms]\nname = ");
    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, XpostError::Config(ConfigError::ParseError(_))));
}

#[test]
fn test_empty_platform_list_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "platforms = []\n");
    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(
        err,
        XpostError::Config(ConfigError::MissingField(ref field)) if field == "platforms"
    ));
}

#[test]
fn test_session_from_loaded_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, VALID);
    let service = ComposeService::from_config(Config::load_from_path(&path).unwrap()).unwrap();

    assert!(!service.is_draft());
    let selected: Vec<_> = service
        .state()
        .selection()
        .selected()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(selected, vec!["bluesky"]);
    assert_eq!(service.templates().get("release").unwrap().label, "Release");
}

#[test]
#[serial]
fn test_env_var_overrides_location() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, VALID);
    std::env::set_var("XPOST_CONFIG", &path);

    assert_eq!(resolve_config_path().unwrap(), path);
    let config = Config::load().unwrap();
    assert!(config.modes.contains_key("release"));

    std::env::remove_var("XPOST_CONFIG");
}

#[test]
#[serial]
fn test_load_or_default_without_file() {
    let temp_dir = TempDir::new().unwrap();
    std::env::set_var("XPOST_CONFIG", temp_dir.path().join("absent.toml"));

    let config = Config::load_or_default().unwrap();
    assert_eq!(config.platforms.len(), 3);
    assert!(config.modes.contains_key("11ty"));

    std::env::remove_var("XPOST_CONFIG");
}

#[test]
#[serial]
fn test_load_or_default_surfaces_parse_errors() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "not = [valid");
    std::env::set_var("XPOST_CONFIG", &path);

    assert!(Config::load_or_default().is_err());

    std::env::remove_var("XPOST_CONFIG");
}
