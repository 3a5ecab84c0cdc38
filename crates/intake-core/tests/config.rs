use intake_core::config::{
    load_config, parse_config, save_config, EngineConfig, MissingScoreSource,
    DEFAULT_MAX_CONDITION_PASSES,
};
use intake_core::error::CoreError;

#[test]
fn empty_object_gets_defaults() {
    let config = parse_config("{}").unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.max_condition_passes, DEFAULT_MAX_CONDITION_PASSES);
    assert_eq!(config.missing_score_source, MissingScoreSource::Zero);
    assert_eq!(config.history_limit, None);
}

#[test]
fn v0_config_is_migrated() {
    let config = parse_config(r#"{"max_iterations": 25, "missing_score_source": "exclude"}"#)
        .unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.max_condition_passes, 25);
    assert_eq!(config.missing_score_source, MissingScoreSource::Exclude);
}

#[test]
fn newer_config_is_rejected() {
    let err = parse_config(r#"{"config_version": 99}"#).unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnsupportedConfigVersion {
            found: 99,
            supported: 1
        }
    ));
}

#[test]
fn non_object_config_is_rejected() {
    assert!(matches!(
        parse_config("[1, 2]").unwrap_err(),
        CoreError::InvalidConfig(_)
    ));
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    let config = EngineConfig {
        config_version: 0,
        max_condition_passes: 4,
        missing_score_source: MissingScoreSource::Exclude,
        history_limit: Some(50),
    };

    save_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();

    assert_eq!(loaded.config_version, 1);
    assert_eq!(loaded.max_condition_passes, 4);
    assert_eq!(loaded.history_limit, Some(50));
    assert!(!path.with_extension("json.tmp").exists());
}
