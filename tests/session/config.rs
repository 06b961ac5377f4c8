use std::fs;

use glint::{GlintError, SearchConfig};

use crate::common::fixtures_dir;

#[test]
fn test_fixture_config_overrides_only_named_fields() {
    let config = SearchConfig::from_path(&fixtures_dir().join("config.json")).unwrap();
    assert_eq!(config.max_highlights, 4);
    assert_eq!(config.query_debounce_ms, 150);
    assert_eq!(config.oracle_timeout().as_millis(), 2000);
    assert_eq!(config.mutation_debounce_ms, SearchConfig::default().mutation_debounce_ms);
}

#[test]
fn test_config_from_tempfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glint.json");
    fs::write(&path, r#"{ "wordWindow": 40, "fuzzyTopK": 2 }"#).unwrap();

    let config = SearchConfig::from_path(&path).unwrap();
    assert_eq!(config.word_window, 40);
    assert_eq!(config.fuzzy_top_k, 2);
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = SearchConfig::from_json(r#"{ "maxHighlight": 3 }"#).unwrap_err();
    assert!(matches!(err, GlintError::Config(_)));
}

#[test]
fn test_zero_limit_is_rejected() {
    let err = SearchConfig::from_json(r#"{ "maxHighlights": 0 }"#).unwrap_err();
    assert!(err.to_string().contains("maxHighlights"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SearchConfig::from_path(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, GlintError::Io { .. }));
}
