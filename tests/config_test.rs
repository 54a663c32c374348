//! Integration tests for Settings config loading.
//!
//! Note: These tests run without a global config and without BOOKCAT_*
//! variables (temp directories only), so they exercise local config merging
//! on top of compiled defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use bookcat::application::services::MalformedLinePolicy;
use bookcat::application::ApplicationError;
use bookcat::config::{local_config_path, Settings, LOCAL_CONFIG_FILE};

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = r#"
data_file = "library.csv"
on_malformed = "abort"
featured = ["Dune"]
"#;
    fs::write(dir.path().join(LOCAL_CONFIG_FILE), config).unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.data_file, PathBuf::from("library.csv"));
    assert_eq!(settings.on_malformed, MalformedLinePolicy::Abort);
    assert_eq!(settings.featured, vec!["Dune"]);
}

#[test]
fn given_partial_local_config_when_load_then_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "on_malformed = \"abort\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.on_malformed, MalformedLinePolicy::Abort);
    assert_eq!(settings.data_file, Settings::default().data_file);
    assert_eq!(settings.featured, Settings::default().featured);
}

#[test]
fn given_invalid_policy_in_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "on_malformed = \"maybe\"\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains(LOCAL_CONFIG_FILE));
}

#[test]
fn given_cli_file_when_applied_then_replaces_configured_data_file() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "data_file = \"library.csv\"\n").unwrap();
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    let settings = settings.with_data_file(PathBuf::from("other.txt"));

    assert_eq!(settings.data_file, PathBuf::from("other.txt"));
}

#[test]
fn given_effective_settings_when_rendered_then_toml_lists_every_field() {
    let toml = Settings::default().to_toml().unwrap();

    assert!(toml.contains("data_file = \"data.txt\""));
    assert!(toml.contains("on_malformed = \"skip\""));
    assert!(toml.contains("Animal Farm"));
}
