//! Server configuration file support.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables. Every field has a default, so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use crate::db::repository::RepositoryError;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ROCKETS_CONFIG";

const CONFIG_FILE_NAME: &str = "rockets.toml";

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub static_files: StaticFileSettings,
}

/// Listener and request settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body size.
    pub body_limit_bytes: usize,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            body_limit_bytes: 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

/// Optional single-page console served next to the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFileSettings {
    pub dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ConfigurationError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration from the first `rockets.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` if no file exists in any of them.
    pub fn from_default_location() -> Result<Option<Self>, RepositoryError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("backend").join(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `ROCKETS_CONFIG` path must exist. Otherwise the default
    /// locations are searched and defaults are used when nothing is found.
    /// Environment overrides are applied last.
    pub fn load() -> Result<Self, RepositoryError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `STATIC_DIR` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), RepositoryError> {
        if let Ok(host) = env::var("HOST") {
            if !host.trim().is_empty() {
                self.server.host = host.trim().to_string();
            }
        }

        if let Ok(port) = env::var("PORT") {
            self.server.port = port.trim().parse().map_err(|e| {
                RepositoryError::configuration(format!("Invalid PORT '{}': {}", port, e))
            })?;
        }

        if let Ok(dir) = env::var("STATIC_DIR") {
            self.static_files.dir = if dir.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(dir.trim()))
            };
        }

        Ok(())
    }

    /// Resolve `host:port` to a bindable address.
    pub fn socket_addr(&self) -> Result<SocketAddr, RepositoryError> {
        let invalid = |reason: String| {
            RepositoryError::configuration(format!(
                "Invalid listen address {}:{}: {}",
                self.server.host, self.server.port, reason
            ))
        };

        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("host did not resolve".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.body_limit_bytes, 1024 * 1024);
        assert!(config.static_files.dir.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 9000
log_level = "debug"

[static_files]
dir = "console/dist"
"#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(
            config.static_files.dir.as_deref(),
            Some(Path::new("console/dist"))
        );
    }

    #[test]
    fn test_socket_addr_from_ip_host() {
        let mut config = ServerConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 3000;

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = ServerConfig::from_file("/definitely/not/here/rockets.toml").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
