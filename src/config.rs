//! Configuration management for the document store server
//!
//! Values come from built-in defaults, then an optional `config.toml`, then
//! `DOCSTORE_`-prefixed environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::storage::ResourceKind;

const CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "DOCSTORE";

/// Directory under `data_dir` that holds the rolling log files
pub const LOG_SUBDIR: &str = "logs";

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK (restart required) ═══
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    // ═══ STORAGE ═══
    /// Root data directory; must exist before startup
    pub data_dir: String,

    /// Number of stripes in the per-resource write lock arena
    pub lock_stripes: usize,

    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,

    // ═══ LOGGING ═══
    /// Default filter for console output when RUST_LOG is unset
    pub log_level: String,

    /// Log files are named `{log_base_name}_{YYYY-MM-DD}.log`
    pub log_base_name: String,

    /// Number of daily log files kept on disk
    pub log_retention: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 24025,
            data_dir: "data".to_string(),
            lock_stripes: 64,
            max_body_bytes: 1024 * 1024,
            log_level: "info".to_string(),
            log_base_name: "server".to_string(),
            log_retention: 10,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml (optional) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", defaults.port as i64)?
            .set_default("data_dir", defaults.data_dir)?
            .set_default("lock_stripes", defaults.lock_stripes as i64)?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_base_name", defaults.log_base_name)?
            .set_default("log_retention", defaults.log_retention as i64)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.data_dir.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "data_dir cannot be empty".into(),
            ));
        }

        if self.log_base_name.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "log_base_name cannot be empty".into(),
            ));
        }

        if self.log_retention == 0 {
            return Err(config::ConfigError::Message(
                "log_retention must be greater than 0".into(),
            ));
        }

        if self.lock_stripes == 0 {
            return Err(config::ConfigError::Message(
                "lock_stripes must be greater than 0".into(),
            ));
        }

        if self.max_body_bytes == 0 {
            return Err(config::ConfigError::Message(
                "max_body_bytes must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get the data directory as PathBuf
    pub fn data_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Directory holding resources of the given kind
    pub fn resource_dir(&self, kind: ResourceKind) -> PathBuf {
        self.data_dir_path().join(kind.subdir())
    }

    /// Directory holding the rolling log files
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir_path().join(LOG_SUBDIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_addr(), "0.0.0.0:24025");
    }

    #[test]
    fn rejects_zero_retention() {
        let config = ServerConfig {
            log_retention: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_data_dir() {
        let config = ServerConfig {
            data_dir: "  ".into(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn derives_directories_from_data_dir() {
        let config = ServerConfig {
            data_dir: "/srv/docstore".into(),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.resource_dir(ResourceKind::Json),
            PathBuf::from("/srv/docstore/configs")
        );
        assert_eq!(
            config.resource_dir(ResourceKind::Text),
            PathBuf::from("/srv/docstore/texts")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/srv/docstore/logs"));
    }
}
