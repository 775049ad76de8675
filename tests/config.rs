//! Configuration system tests
//!
//! Tests for config paths, composer config persistence and directory files.

use tagline::config::ComposerConfig;
use tagline::config_paths;
use tagline::tokenize::{DirectoryError, EntityDirectory};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("tagline"));
}

#[test]
fn test_files_live_under_config_dir() {
    let config = config_paths::config_dir().unwrap();
    assert!(config_paths::config_file().unwrap().starts_with(&config));
    assert!(config_paths::directory_file().unwrap().ends_with("directory.yaml"));
    assert!(config_paths::logs_dir().unwrap().starts_with(&config));
}

// ========================================================================
// Composer Config Tests
// ========================================================================

#[test]
fn test_save_then_load() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("config.yaml");

    let mut config = ComposerConfig::default();
    config.candidate_limit = 5;
    config.caret.font_size = 16.0;
    config.links.mention = "/u/{id}".to_string();
    config.save_to(&path).unwrap();

    let loaded = ComposerConfig::load_from(&path);
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let loaded = ComposerConfig::load_from(&tmp.path().join("absent.yaml"));
    assert_eq!(loaded, ComposerConfig::default());
}

#[test]
fn test_invalid_yaml_gives_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "max_query_len: [not a number").unwrap();
    assert_eq!(ComposerConfig::load_from(&path), ComposerConfig::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "max_query_len: 12\ncaret:\n  tab_width: 8\n").unwrap();

    let loaded = ComposerConfig::load_from(&path);
    assert_eq!(loaded.max_query_len, 12);
    assert_eq!(loaded.candidate_limit, 8);
    assert_eq!(loaded.caret.tab_width, 8);
    assert_eq!(loaded.caret.font_size, 14.0);
}

// ========================================================================
// Directory File Tests
// ========================================================================

#[test]
fn test_load_directory_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("directory.yaml");
    std::fs::write(
        &path,
        concat!(
            "users:\n",
            "  - id: u1\n    handle: jdoe\n    display_label: Jan Doe\n    avatar_ref: a.png\n",
            "hashtags:\n  - tag: pool\n",
        ),
    )
    .unwrap();

    let dir = EntityDirectory::load(&path).unwrap();
    assert_eq!(dir.users()[0].avatar_ref.as_deref(), Some("a.png"));
    assert_eq!(dir.hashtags()[0].use_count, 0);
}

#[test]
fn test_missing_directory_file_is_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = EntityDirectory::load(&tmp.path().join("none.yaml")).unwrap_err();
    assert!(matches!(err, DirectoryError::Io(_)));
}
