//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use ausmass_infra::config;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "server": {
            "host": "0.0.0.0",
            "port": 9090
        },
        "bexio": {
            "api_token": "json-token",
            "fallback_tax_id": 400
        },
        "store": {
            "base_url": "https://store.example",
            "service_role_key": "json-key"
        }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_ok(), "Failed to load config from JSON file");

    let config = result.unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.bexio.api_token, "json-token");
    assert_eq!(config.bexio.fallback_tax_id, 400);
    // Unspecified settings keep their defaults.
    assert_eq!(config.bexio.fallback_zero_tax_id, 2);
    assert_eq!(config.bexio.base_url, "https://api.bexio.com/3.0");
    assert_eq!(config.store.base_url, "https://store.example");
    assert_eq!(config.store.service_role_key, "json-key");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8800

[bexio]
api_token = "toml-token"
base_url = "https://bexio.example/3.0"
legacy_base_url = "https://bexio.example/2.0"

[store]
base_url = "https://store.example"
service_role_key = "toml-key"
timeout_secs = 10
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_ok(), "Failed to load config from TOML file");

    let config = result.unwrap();

    assert_eq!(config.server.port, 8800);
    assert_eq!(config.bexio.api_token, "toml-token");
    assert_eq!(config.bexio.base_url, "https://bexio.example/3.0");
    assert_eq!(config.bexio.legacy_base_url, "https://bexio.example/2.0");
    assert_eq!(config.store.timeout_secs, 10);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_is_a_config_error() {
    let result = config::load_from_file(Some("/nonexistent/ausmass.toml".into()));
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_rejected() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"[bexio\napi_token = ").expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_err());

    std::fs::remove_file(path).ok();
}
