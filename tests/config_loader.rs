use mailbrief::config::{Config, ConfigError, PlacementMode};
use std::fs;
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    (dir, path)
}

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "https://api.anthropic.com");
    assert_eq!(config.api.model, "claude-sonnet-4-20250514");
    assert_eq!(config.api.max_tokens, 2048);
    assert_eq!(config.limits.truncate_at, 100_000);
    assert_eq!(config.limits.reject_at, 120_000);
    assert_eq!(config.agent.initial_placement_delay_ms, 1000);
    assert_eq!(config.agent.late_placement_delay_ms, 3000);
    assert_eq!(config.agent.copy_feedback_ms, 2000);
    assert_eq!(config.agent.placement, PlacementMode::Contextual);
}

#[test]
fn test_config_path_ends_with_expected() {
    assert!(Config::config_path().ends_with("mailbrief/config.toml"));
    assert!(Config::credentials_path().ends_with("mailbrief/credentials.toml"));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let (_dir, path) = write_config(
        r#"
[api]
model = "claude-haiku"

[agent]
placement = "fixed"
copy_feedback_ms = 500
"#,
    );

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.api.model, "claude-haiku");
    assert_eq!(config.api.base_url, "https://api.anthropic.com");
    assert_eq!(config.agent.placement, PlacementMode::Fixed);
    assert_eq!(config.agent.copy_feedback_ms, 500);
    assert_eq!(config.agent.initial_placement_delay_ms, 1000);
    assert_eq!(config.limits.reject_at, 120_000);
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let (_dir, path) = write_config("[api\nmodel = ");
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_unknown_placement_is_a_parse_error() {
    let (_dir, path) = write_config("[agent]\nplacement = \"floating\"\n");
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_truncation_above_ceiling_fails_validation() {
    let (_dir, path) = write_config("[limits]\ntruncate_at = 200000\nreject_at = 120000\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("truncate_at"));
}

#[test]
fn test_zero_max_tokens_fails_validation() {
    let mut config = Config::default();
    config.api.max_tokens = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn test_empty_base_url_fails_validation() {
    let mut config = Config::default();
    config.api.base_url = "  ".to_string();
    assert!(config.validate().is_err());
}
