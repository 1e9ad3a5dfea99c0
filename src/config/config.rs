//! TOML configuration parsing and management.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::environment::EnvironmentLoader;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage backend used for products and carts.
///
/// Users are always kept on a schema-validated document container; see
/// [`crate::dao::Daos`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One JSON array file per collection under `data_dir`
    #[serde(alias = "archivo")]
    File,
    /// In-process document collection, lost on exit
    #[serde(alias = "memoria")]
    Memory,
    /// MongoDB document collections
    #[serde(alias = "mongo")]
    MongoDb,
}

impl BackendKind {
    /// Backend name as written in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::Memory => "memory",
            BackendKind::MongoDb => "mongodb",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "archivo" => Ok(BackendKind::File),
            "memory" | "memoria" => Ok(BackendKind::Memory),
            "mongodb" | "mongo" => Ok(BackendKind::MongoDb),
            other => Err(anyhow!("Unknown persistence backend: {}", other)),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    /// Directory holding `<collection>.json` files for the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    pub mongo_url: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    /// Lock file wait for the file backend, in milliseconds. 0 disables locking.
    #[serde(default)]
    pub file_lock_timeout_ms: u64,
}

fn default_backend() -> BackendKind {
    BackendKind::File
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./DB")
}

fn default_database() -> String {
    "ecommerce".to_string()
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
            mongo_url: None,
            database: default_database(),
            file_lock_timeout_ms: 0,
        }
    }
}

impl PersistenceConfig {
    /// Path of the JSON file backing `collection` for the file backend
    pub fn collection_file(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection))
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Loads and manages TOML configuration.
#[derive(Debug)]
pub struct ConfigurationLoader {
    pub config_path: PathBuf,
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None, uses `config/storekit.toml`
    ///   when present and the defaults otherwise.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config/storekit.toml"));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            Self::get_default_config()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-parsed Configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: PathBuf::from("config/storekit.toml"),
            config,
        }
    }

    /// Apply environment overrides on top of the file configuration.
    pub fn with_environment(mut self, env: &EnvironmentLoader) -> Result<Self> {
        let persistence = &mut self.config.persistence;

        if let Some(backend) = env.persistence_backend() {
            persistence.backend = backend
                .parse()
                .with_context(|| "Invalid STOREKIT_PERSISTENCE value")?;
        }
        if let Some(dir) = env.data_dir() {
            persistence.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = env.mongo_url() {
            persistence.mongo_url = Some(url);
        }
        if let Some(database) = env.mongo_database() {
            persistence.database = database;
        }
        if let Some(level) = env.log_level() {
            self.config.logging.level = level;
        }

        Ok(self)
    }

    /// Load configuration from TOML file.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Get default configuration.
    fn get_default_config() -> Configuration {
        Configuration::default()
    }

    /// Get configuration value by dot-notation key.
    pub fn get_string(&self, key: &str) -> Option<String> {
        let persistence = &self.config.persistence;
        match key {
            "persistence.backend" => Some(persistence.backend.to_string()),
            "persistence.data_dir" => Some(persistence.data_dir.to_string_lossy().to_string()),
            "persistence.mongo_url" => persistence.mongo_url.clone(),
            "persistence.database" => Some(persistence.database.clone()),
            "logging.level" => Some(self.config.logging.level.clone()),
            _ => None,
        }
    }

    /// Get numeric configuration value.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match key {
            "persistence.file_lock_timeout_ms" => {
                Some(self.config.persistence.file_lock_timeout_ms)
            }
            _ => None,
        }
    }
}
