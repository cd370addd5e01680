//! Integration tests for Settings layered loading.
//!
//! These tests run without a global config (temp directories only),
//! so they test local config merging with defaults.

use std::fs;

use tempfile::TempDir;

use workpaths::config::{local_config_path, OutputFormat, Settings};
use workpaths::domain::{WorkItemState, WorkItemType};

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
format = "json"
pad_trees = false
project = "Noda"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.format, OutputFormat::Json);
    assert!(!settings.pad_trees);
    assert_eq!(settings.project, "Noda");
    assert!(settings.pretty, "unspecified fields keep defaults");
}

#[test]
fn given_local_mapping_when_load_then_parses_tables() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
[mapping.types]
"Product Backlog Item" = "STORY"

[mapping.states]
"Committed" = "IN_PROGRESS"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(
        settings.mapping.types.get("Product Backlog Item"),
        Some(&WorkItemType::Story)
    );
    assert_eq!(
        settings.mapping.states.get("Committed"),
        Some(&WorkItemState::InProgress)
    );
}

#[test]
fn given_invalid_local_config_when_load_then_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "format = [not toml").unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("config error"));
}

#[test]
fn given_no_local_config_when_load_then_pads_by_default() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert!(settings.pad_trees);
}

#[test]
fn given_template_when_written_as_local_config_then_loads() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(settings.format, OutputFormat::Tree);
}
