//! Integration tests for executor configuration loading

mod common;

use common::*;
use select::prelude::*;
use serde_json::json;
use std::io::Write;

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    writeln!(file, "max_depth: 3\ntypename_key: kind").expect("should write config");

    let config = ExecutorConfig::from_yaml_file(file.path()).expect("should load config");
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.typename_key, "kind");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("missing.yaml");

    let err = ExecutorConfig::from_yaml_file(&path).expect_err("file does not exist");
    assert_eq!(err.error_code(), "CONFIG_IO_ERROR");
    assert!(err.to_string().contains("missing.yaml"));
}

#[test]
fn test_unknown_shape_is_a_parse_error() {
    let err = ExecutorConfig::from_yaml_str("max_depth: deep").expect_err("not a number");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_loaded_config_drives_execution() {
    init_tracing();
    let config = ExecutorConfig::from_yaml_str(
        r#"
max_depth: 2
typename_key: kind
"#,
    )
    .expect("should parse");
    let executor = Executor::new(config);

    let shallow = Query::new(
        Field::root().field(
            Field::object("user")
                .field(Field::fragment("Admin").field(Field::scalar("level"))),
        ),
    )
    .expect("valid query");
    let response = executor
        .execute(&shallow, &json!({"user": {"kind": "Admin", "level": 3}}).into())
        .expect("should execute");
    assert_eq!(response, json!({"user": {"level": 3}}));

    let deep = Query::new(
        Field::root().field(
            Field::object("a").field(Field::object("b").field(Field::scalar("c"))),
        ),
    )
    .expect("valid query");
    let err = executor
        .execute(&deep, &json!({"a": {"b": {"c": 1}}}).into())
        .expect_err("too deep");
    assert!(matches!(
        err,
        ExecutionError::DepthLimitExceeded { max_depth: 2, .. }
    ));
}

#[test]
fn test_config_roundtrips_through_yaml() {
    let config = ExecutorConfig::default().with_max_depth(10);
    let yaml = serde_yaml::to_string(&config).expect("should serialize");
    let restored = ExecutorConfig::from_yaml_str(&yaml).expect("should parse");
    assert_eq!(config, restored);
}
