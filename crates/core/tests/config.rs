use std::fs;
use std::path::Path;

use tempfile::tempdir;
use vizscan_core::config::{load_scan_config, ConfigError, ScanConfig};

#[test]
fn defaults_match_cli_defaults() {
    let config = ScanConfig::default();
    assert!(!config.enable_dynamic);
    assert_eq!(config.duration, 5);
    assert_eq!(config.fps, 60);
    assert_eq!(config.output, "hybrid_report.jsonld");
    assert_eq!(config.extensions, vec!["milk".to_string(), "json".to_string()]);
    assert!(config.validate().is_ok());
}

#[test]
fn loads_partial_yaml() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("vizscan.yaml");
    fs::write(&path, "enable_dynamic: true\nfps: 30\n").expect("write config");

    let config = load_scan_config(&path).expect("load config");
    assert!(config.enable_dynamic);
    assert_eq!(config.fps, 30);
    assert_eq!(config.duration, 5);

    let options = config.hybrid_options();
    assert!(options.enable_dynamic);
    assert_eq!(options.fps, 30);
}

#[test]
fn loads_json_by_extension() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("vizscan.json");
    fs::write(&path, r#"{"output": "out.jsonld", "extensions": ["milk"]}"#).expect("write config");

    let config = load_scan_config(&path).expect("load config");
    assert_eq!(config.output, "out.jsonld");
    assert!(config.matches_extension(Path::new("a/b.milk")));
    assert!(!config.matches_extension(Path::new("a/b.json")));
    assert!(!config.matches_extension(Path::new("README")));
}

#[test]
fn rejects_zero_fps_with_dynamic() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "enable_dynamic: true\nfps: 0\n").expect("write config");

    let err = load_scan_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn reports_missing_and_malformed_files() {
    let dir = tempdir().expect("tempdir");
    let missing = load_scan_config(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write config");
    assert!(matches!(load_scan_config(&path).unwrap_err(), ConfigError::Json(_)));
}
