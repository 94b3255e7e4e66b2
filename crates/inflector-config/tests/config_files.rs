//! Loading configuration from files on disk.

use std::io::Write;

use inflector_config::{ConfigError, ConfigLoader};
use tempfile::NamedTempFile;

fn file_with(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_toml_file() {
    let file = file_with(
        ".toml",
        r#"
[server]
http_addr = "127.0.0.1:7000"

[dispatch]
swagger_url = "api/petstore.json"
pretty_print = true
"#,
    );

    let config = ConfigLoader::new()
        .with_file(file.path())
        .expect("file loads")
        .load()
        .expect("valid config");

    assert_eq!(config.server.http_addr, "127.0.0.1:7000");
    assert_eq!(config.dispatch.swagger_url, "api/petstore.json");
    assert!(config.dispatch.pretty_print);
    assert_eq!(config.server.shutdown_timeout_secs, 30);
}

#[test]
fn loads_yaml_file() {
    let file = file_with(
        ".yml",
        "dispatch:\n  controller_package: com.acme.api\nlogging:\n  level: warn\n",
    );

    let config = ConfigLoader::new()
        .with_file(file.path())
        .expect("file loads")
        .load()
        .expect("valid config");

    assert_eq!(config.dispatch.controller_package, "com.acme.api");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn later_files_override_earlier_ones() {
    let base = file_with(".json", r#"{ "server": { "http_addr": "127.0.0.1:1000", "max_body_size": 64 } }"#);
    let local = file_with(".json", r#"{ "server": { "http_addr": "127.0.0.1:2000" } }"#);

    let config = ConfigLoader::new()
        .with_file(base.path())
        .and_then(|loader| loader.with_file(local.path()))
        .expect("files load")
        .load()
        .expect("valid config");

    assert_eq!(config.server.http_addr, "127.0.0.1:2000");
    assert_eq!(config.server.max_body_size, 64);
}

#[test]
fn missing_file_is_an_error_unless_optional() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.yaml");

    assert!(matches!(
        ConfigLoader::new().with_file(&path),
        Err(ConfigError::FileNotFound { .. })
    ));
    assert!(ConfigLoader::new().with_optional_file(&path).is_ok());
}

#[test]
fn malformed_file_is_reported() {
    let file = file_with(".toml", "[server\nhttp_addr = ");
    assert!(matches!(
        ConfigLoader::new().with_file(file.path()),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn unknown_extension_is_rejected() {
    let file = file_with(".ini", "[server]");
    assert!(matches!(
        ConfigLoader::new().with_file(file.path()),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}
