//! Configuration resolution: explicit file, defaults and env overrides.

mod support;

use std::io::Write;
use std::path::Path;

use rockets_backend::config::{ServerConfig, CONFIG_PATH_ENV};
use rockets_backend::db::RepositoryError;
use support::with_scoped_env;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_explicit_path() {
    let file = config_file(
        r#"
[server]
host = "127.0.0.1"
port = 9100
body_limit_bytes = 4096

[static_files]
dir = "console/dist"
"#,
    );
    let path = file.path().to_str().unwrap();

    let env = [
        (CONFIG_PATH_ENV, Some(path)),
        ("HOST", None),
        ("PORT", None),
        ("STATIC_DIR", None),
    ];
    let config = with_scoped_env(&env, ServerConfig::load).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.body_limit_bytes, 4096);
    assert_eq!(config.server.log_level, "info");
    assert_eq!(
        config.static_files.dir.as_deref(),
        Some(Path::new("console/dist"))
    );
}

#[test]
fn test_env_overrides_file_values() {
    let file = config_file("[server]\nport = 9100\n");
    let path = file.path().to_str().unwrap();

    let env = [
        (CONFIG_PATH_ENV, Some(path)),
        ("HOST", Some("127.0.0.1")),
        ("PORT", Some("7000")),
        ("STATIC_DIR", Some("/srv/console")),
    ];
    let config = with_scoped_env(&env, ServerConfig::load).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 7000);
    assert_eq!(
        config.static_files.dir.as_deref(),
        Some(Path::new("/srv/console"))
    );
    assert_eq!(
        config.socket_addr().unwrap().to_string(),
        "127.0.0.1:7000"
    );
}

#[test]
fn test_invalid_port_is_configuration_error() {
    let file = config_file("");
    let path = file.path().to_str().unwrap();

    let env = [(CONFIG_PATH_ENV, Some(path)), ("PORT", Some("eighty"))];
    let err = with_scoped_env(&env, ServerConfig::load).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let env = [(CONFIG_PATH_ENV, Some("/nonexistent/rockets.toml"))];
    let err = with_scoped_env(&env, ServerConfig::load).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[test]
fn test_malformed_file_is_error() {
    let file = config_file("[server]\nport = \"not a number\"\n");
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    assert!(err.message().contains("parse"));
}

#[test]
fn test_empty_static_dir_disables_console() {
    let file = config_file("[static_files]\ndir = \"console\"\n");
    let path = file.path().to_str().unwrap();

    let env = [
        (CONFIG_PATH_ENV, Some(path)),
        ("PORT", None),
        ("STATIC_DIR", Some("")),
    ];
    let config = with_scoped_env(&env, ServerConfig::load).unwrap();
    assert!(config.static_files.dir.is_none());
}
