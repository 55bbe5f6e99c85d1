//! # Configuration Loading Tests
//!
//! File-based loading through the `config` crate, with defaults filled in and
//! validation applied.

use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tasker_health::config::HealthServiceConfig;
use tasker_health::health::{HealthAggregator, StaticFrontend};
use tasker_health::TaskerHealthError;

fn write_config(extension: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .expect("temp file should be created");
    file.write_all(contents.as_bytes())
        .expect("config should be written");
    file
}

#[test]
fn test_yaml_config_with_database_defaults() {
    let file = write_config(
        ".yaml",
        r#"
engine_name: default
database:
  url: postgresql://localhost/tasker_health_test
"#,
    );

    let config = HealthServiceConfig::load(Some(file.path())).expect("config should load");

    assert_eq!(config.engine_name.as_deref(), Some("default"));
    let database = config.database.expect("database should be configured");
    assert_eq!(database.url, "postgresql://localhost/tasker_health_test");
    assert_eq!(database.max_connections, 2);
    assert_eq!(database.validation_timeout(), Duration::from_secs(2));
    assert!(config.frontend.is_none());
}

#[test]
fn test_toml_config_with_frontend_details() {
    let file = write_config(
        ".toml",
        r#"
[database]
url = "postgresql://localhost/tasker_health_test"
acquire_timeout_ms = 500
validation_timeout_ms = 750

[frontend]
operational = "up"
build = "2024.10"
"#,
    );

    let config = HealthServiceConfig::load(Some(file.path())).expect("config should load");

    let database = config.database.expect("database should be configured");
    assert_eq!(database.acquire_timeout(), Duration::from_millis(500));
    assert_eq!(database.probe_settings().validation_timeout, Duration::from_millis(750));

    let frontend = config.frontend.expect("frontend should be configured");
    assert_eq!(frontend.get("operational"), Some(&json!("up")));
    assert_eq!(frontend.len(), 2);
}

#[test]
fn test_yaml_frontend_keeps_key_case_order_and_types() {
    let file = write_config(
        ".yaml",
        r#"
frontend:
  buildVersion: '1.2'
  Operational: up
  workers: 3
  cdnReachable: true
"#,
    );

    let config = HealthServiceConfig::load(Some(file.path())).expect("config should load");

    let frontend = config.frontend.expect("frontend should be configured");
    assert_eq!(
        Value::Object(frontend),
        json!({"buildVersion": "1.2", "Operational": "up", "workers": 3, "cdnReachable": true})
    );
}

#[test]
fn test_configured_frontend_reaches_health_details_unchanged() {
    let file = write_config(
        ".json",
        r#"{"frontend": {"assetsVersion": "abc123", "Operational": "up"}}"#,
    );
    let config = HealthServiceConfig::load(Some(file.path())).expect("config should load");
    let frontend = config.frontend.expect("frontend should be configured");

    let aggregator = HealthAggregator::builder()
        .frontend(Arc::new(StaticFrontend::new(frontend)))
        .build();
    let result = tokio_test::block_on(aggregator.check());

    let keys: Vec<&str> = result
        .detail("frontend")
        .and_then(Value::as_object)
        .map(|details| details.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, vec!["assetsVersion", "Operational"]);
}

#[test]
fn test_frontend_that_is_not_a_mapping_is_rejected() {
    let file = write_config(".yaml", "frontend: up\n");

    let error = HealthServiceConfig::load(Some(file.path())).expect_err("scalar frontend should fail");
    assert!(matches!(error, TaskerHealthError::InvalidConfiguration(_)));
}

#[test]
fn test_invalid_database_settings_are_rejected() {
    let file = write_config(
        ".yaml",
        r#"
database:
  url: postgresql://localhost/tasker_health_test
  max_connections: 0
"#,
    );

    let error = HealthServiceConfig::load(Some(file.path())).expect_err("zero pool must fail");
    assert!(matches!(error, TaskerHealthError::InvalidConfiguration(_)));
}

#[test]
fn test_missing_file_is_a_configuration_error() {
    let error = HealthServiceConfig::load(Some("does/not/exist.yaml".as_ref()))
        .expect_err("missing file must fail");
    assert!(matches!(error, TaskerHealthError::ConfigurationError(_)));
}
