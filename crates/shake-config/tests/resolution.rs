//! Configuration resolution through the public API.

use shake_config::resolve::{resolve_with, ENV_CONFIG_PATH, ENV_FLUSH_TIMEOUT, ENV_OUTPUT_DIR};
use shake_config::{
    get_preset, validate, ConfigError, ConfigSource, IsolationMode, PresetName, ShakeConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn partial_file_fills_remaining_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shake.json");
    std::fs::write(&path, r#"{"flush":{"isolation":"process","nice_increment":5}}"#).unwrap();

    let resolved = resolve_with(Some(&path), no_env, None).unwrap();
    let flush = &resolved.config.flush;
    assert_eq!(flush.isolation, IsolationMode::Process);
    assert_eq!(flush.nice_increment, 5);
    assert_eq!(flush.timeout(), Duration::from_secs(600));
    assert_eq!(resolved.config.motion, ShakeConfig::default().motion);
}

#[test]
fn env_overrides_apply_on_top_of_xdg_file() {
    let dir = tempdir().unwrap();
    let xdg = dir.path().join("config.json");
    std::fs::write(&xdg, r#"{"flush":{"timeout_secs":120}}"#).unwrap();

    let env = |var: &str| match var {
        v if v == ENV_FLUSH_TIMEOUT => Some("15".to_string()),
        v if v == ENV_OUTPUT_DIR => Some("/srv/shake/raw".to_string()),
        _ => None,
    };
    let resolved = resolve_with(None, env, Some(&xdg)).unwrap();
    assert_eq!(resolved.source, ConfigSource::Xdg(xdg));
    assert_eq!(resolved.config.flush.timeout_secs, 15);
    assert_eq!(
        resolved.config.output.resolved_dir(),
        PathBuf::from("/srv/shake/raw")
    );
}

#[test]
fn env_path_to_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let missing_str = missing.to_string_lossy().to_string();
    let env = move |var: &str| (var == ENV_CONFIG_PATH).then(|| missing_str.clone());

    let err = resolve_with(None, env, None).unwrap_err();
    assert!(matches!(err, ConfigError::Io { path, .. } if path == missing));
}

#[test]
fn malformed_json_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ flush: ").unwrap();
    let err = resolve_with(Some(&path), no_env, None).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn non_numeric_timeout_env_is_rejected() {
    let env = |var: &str| (var == ENV_FLUSH_TIMEOUT).then(|| "soon".to_string());
    let err = resolve_with(None, env, None).unwrap_err();
    assert!(err.to_string().contains(ENV_FLUSH_TIMEOUT));
}

#[test]
fn invalid_values_are_all_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"flush":{"timeout_secs":0},"motion":{"feedrate":-1},"output":{"prefix":"a_b"}}"#,
    )
    .unwrap();

    match resolve_with(Some(&path), no_env, None).unwrap_err() {
        ConfigError::Invalid(errors) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert!(fields.contains(&"flush.timeout_secs"));
            assert!(fields.contains(&"motion.feedrate"));
            assert!(fields.contains(&"output.prefix"));
        }
        other => panic!("expected validation failure, got {other}"),
    }
}

#[test]
fn presets_round_trip_through_json() {
    for name in PresetName::ALL {
        let config = get_preset(name);
        assert!(validate(&config).is_valid(), "{} invalid", name.as_str());

        let text = serde_json::to_string(&config).unwrap();
        let back: ShakeConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
