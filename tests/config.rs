//! Configuration system tests
//!
//! Tests for config paths and playground config loading/saving.

use std::time::Duration;

use maskedit::cli::CliArgs;
use maskedit::config::PlaygroundConfig;
use maskedit::config_paths;
use maskedit::{MaskOptions, MaskSource};

use clap::Parser;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("maskedit"));
}

#[test]
fn test_config_file_ends_with_yaml() {
    let path = config_paths::config_file().unwrap();
    assert!(path.to_string_lossy().ends_with("config.yaml"));
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    let config = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert!(logs.starts_with(&config));
}

// ========================================================================
// Playground Config Tests
// ========================================================================

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = PlaygroundConfig {
        options: MaskOptions::with_mask(MaskSource::Date).lazy(false),
        correction_delay_ms: 30,
    };
    config.save_to(&path).unwrap();
    assert!(path.exists());

    let loaded = PlaygroundConfig::load_from(&path);
    assert_eq!(loaded, config);
    assert_eq!(loaded.controller_settings().correction_delay, Duration::from_millis(30));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = PlaygroundConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(loaded, PlaygroundConfig::default());
}

#[test]
fn test_malformed_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "options: [not, a, map]\n").unwrap();

    assert_eq!(PlaygroundConfig::load_from(&path), PlaygroundConfig::default());
}

#[test]
fn test_saved_yaml_uses_mask_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    PlaygroundConfig {
        options: MaskOptions::with_mask(MaskSource::regex("[a-z]*")),
        correction_delay_ms: 10,
    }
    .save_to(&path)
    .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("/[a-z]*/"), "got: {}", content);
    assert!(!content.contains("lazy"));
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "options:\n  mask: \"00/00\"\n  lazy: false\n").unwrap();
    let config = PlaygroundConfig::load_from(&path);

    let args = CliArgs::try_parse_from(["maskedit", "--placeholder", "#"]).unwrap();
    let options = args.options(&config);
    assert_eq!(options.mask, Some(MaskSource::pattern("00/00")));
    assert_eq!(options.lazy, Some(false));
    assert_eq!(options.placeholder_char, Some('#'));

    let args = CliArgs::try_parse_from(["maskedit", "--date"]).unwrap();
    assert_eq!(args.options(&config).mask, Some(MaskSource::Date));
}
