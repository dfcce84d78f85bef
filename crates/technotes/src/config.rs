//! Configuration management for technotes.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "technotes";

/// Default location of the posts document, relative to the working directory.
const DEFAULT_POSTS_PATH: &str = "content/posts.json";

/// Environment variable prefix.
const ENV_PREFIX: &str = "TECHNOTES_";

/// Runtime mode of the process.
///
/// Only [`RunMode::Development`] grants write access to the posts document;
/// the other modes serve the collection read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Local authoring: admin pages enabled, mutations flushed to disk.
    #[serde(alias = "dev")]
    Development,
    /// Public serving: read-only.
    #[default]
    #[serde(alias = "prod")]
    Production,
    /// Automated tests: read-only, like production.
    Test,
}

impl RunMode {
    /// Whether this mode may create, edit or delete posts.
    #[must_use]
    pub fn allows_writes(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TECHNOTES_`, nested keys split on `__`)
/// 2. TOML config file at `~/.config/technotes/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runtime mode.
    pub mode: RunMode,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: String,
    /// Number of posts per page on the home page.
    pub page_size: usize,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the posts document.
    /// Defaults to `content/posts.json` in the working directory.
    pub posts_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            page_size: 20,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `TECHNOTES_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &std::path::Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page_size must be greater than 0".to_string(),
            });
        }

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid bind_addr: {}", self.server.bind_addr),
            });
        }

        if let Some(path) = &self.storage.posts_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "posts_path cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the posts document path, resolving defaults if not set.
    #[must_use]
    pub fn posts_path(&self) -> PathBuf {
        self.storage
            .posts_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTS_PATH))
    }

    /// Get the bind address as a socket address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid bind_addr: {}", self.server.bind_addr),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.mode, RunMode::Production);
        assert_eq!(config.server.page_size, 20);
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert!(config.storage.posts_path.is_none());
    }

    #[test]
    fn test_run_mode_allows_writes() {
        assert!(RunMode::Development.allows_writes());
        assert!(!RunMode::Production.allows_writes());
        assert!(!RunMode::Test.allows_writes());
    }

    #[test]
    fn test_run_mode_display() {
        assert_eq!(RunMode::Development.to_string(), "development");
        assert_eq!(RunMode::Production.to_string(), "production");
        assert_eq!(RunMode::Test.to_string(), "test");
    }

    #[test]
    fn test_run_mode_serde() {
        let json = serde_json::to_string(&RunMode::Development).unwrap();
        assert_eq!(json, "\"development\"");
        let mode: RunMode = serde_json::from_str("\"test\"").unwrap();
        assert_eq!(mode, RunMode::Test);
        let mode: RunMode = serde_json::from_str("\"dev\"").unwrap();
        assert_eq!(mode, RunMode::Development);
        assert!(serde_json::from_str::<RunMode>("\"staging\"").is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = Config::default();
        config.server.page_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page_size"));
    }

    #[test]
    fn test_validate_bad_bind_addr() {
        let mut config = Config::default();
        config.server.bind_addr = "not an address".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("bind_addr"));
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_validate_empty_posts_path() {
        let mut config = Config::default();
        config.storage.posts_path = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("posts_path"));
    }

    #[test]
    fn test_posts_path_default() {
        let config = Config::default();
        assert_eq!(config.posts_path(), PathBuf::from("content/posts.json"));
    }

    #[test]
    fn test_posts_path_custom() {
        let mut config = Config::default();
        config.storage.posts_path = Some(PathBuf::from("/srv/notes/posts.json"));

        assert_eq!(config.posts_path(), PathBuf::from("/srv/notes/posts.json"));
    }

    #[test]
    fn test_bind_addr_parses() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("technotes"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_toml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "technotes.toml",
                r#"
                mode = "development"

                [server]
                page_size = 5

                [storage]
                posts_path = "notes.json"
                "#,
            )?;
            jail.set_env("TECHNOTES_SERVER__BIND_ADDR", "0.0.0.0:8080");

            let config =
                Config::load_from(Some(PathBuf::from("technotes.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.mode, RunMode::Development);
            assert_eq!(config.server.page_size, 5);
            assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.posts_path(), PathBuf::from("notes.json"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_mode() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TECHNOTES_MODE", "test");
            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.mode, RunMode::Test);
            Ok(())
        });
    }

    #[test]
    fn test_env_accepts_short_mode() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TECHNOTES_MODE", "dev");
            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert!(config.mode.allows_writes());
            Ok(())
        });
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("page_size"));
        assert!(json.contains("\"mode\":\"production\""));
    }

    #[test]
    fn test_server_config_deserialize() {
        let json = r#"{"page_size": 10}"#;
        let server: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(server.page_size, 10);
        assert_eq!(server.bind_addr, "127.0.0.1:3000");
    }
}
