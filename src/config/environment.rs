//! Environment variable loading and management.
//!
//! Connection strings and backend selection usually come from the host
//! environment rather than the TOML file, so they can differ per deployment.

use std::env;
use std::path::Path;

/// Loads environment variables from .env file and system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to .env file. Only an explicit path is loaded.
    pub fn new(env_file: Option<&Path>) -> Self {
        // Only load a .env file if an explicit path was provided. This avoids
        // picking up repository .env files during unit tests.
        if let Some(env_path) = env_file {
            if env_path.exists() {
                if let Err(e) = dotenv::from_path(env_path) {
                    eprintln!("Warning: Failed to load .env file: {}", e);
                }
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_string_lossy().to_string()),
        }
    }

    /// The .env file this loader was created with, if any
    pub fn env_file(&self) -> Option<&str> {
        self.env_file.as_deref()
    }

    /// Backend for products and carts (`file`, `memory`, `mongodb`).
    pub fn persistence_backend(&self) -> Option<String> {
        non_empty("STOREKIT_PERSISTENCE")
    }

    /// Directory for the file backend.
    pub fn data_dir(&self) -> Option<String> {
        non_empty("STOREKIT_DATA_DIR")
    }

    /// MongoDB connection string.
    pub fn mongo_url(&self) -> Option<String> {
        non_empty("MONGO_URL")
    }

    /// MongoDB database name.
    pub fn mongo_database(&self) -> Option<String> {
        non_empty("MONGO_DATABASE")
    }

    /// Default log filter directive.
    pub fn log_level(&self) -> Option<String> {
        non_empty("STOREKIT_LOG")
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendKind, ConfigurationLoader};
    use std::io::Write;

    #[test]
    fn test_environment_overrides() {
        env::set_var("STOREKIT_PERSISTENCE", "memoria");
        env::set_var("MONGO_DATABASE", "shop_test");
        env::set_var("STOREKIT_DATA_DIR", "");

        let env_loader = EnvironmentLoader::default();
        assert_eq!(env_loader.persistence_backend(), Some("memoria".to_string()));
        assert_eq!(env_loader.data_dir(), None);

        let loader = ConfigurationLoader::new(Some(Path::new("/nonexistent.toml")))
            .unwrap()
            .with_environment(&env_loader)
            .unwrap();
        assert_eq!(loader.config.persistence.backend, BackendKind::Memory);
        assert_eq!(loader.config.persistence.database, "shop_test");

        env::set_var("STOREKIT_PERSISTENCE", "firebase");
        let result = ConfigurationLoader::new(Some(Path::new("/nonexistent.toml")))
            .unwrap()
            .with_environment(&env_loader);
        assert!(result.is_err());

        env::remove_var("STOREKIT_PERSISTENCE");
        env::remove_var("MONGO_DATABASE");
        env::remove_var("STOREKIT_DATA_DIR");
    }

    #[test]
    fn test_env_file_loading() {
        let env_loader = EnvironmentLoader::new(None);
        assert!(env_loader.env_file().is_none());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "STOREKIT_TEST_ONLY_URL=mongodb://example:27017").unwrap();

        let env_loader = EnvironmentLoader::new(Some(file.path()));
        assert!(env_loader.env_file().is_some());
        assert_eq!(
            env::var("STOREKIT_TEST_ONLY_URL").ok().as_deref(),
            Some("mongodb://example:27017")
        );
    }
}
