//! Configuration management for the storage layer.
//!
//! This module provides configuration loading through TOML files and
//! environment variable management via `.env` files.
//!
//! # Example
//!
//! ```no_run
//! use storekit::config::{ConfigurationLoader, EnvironmentLoader};
//! use std::path::Path;
//!
//! // Load environment variables
//! let env = EnvironmentLoader::new(Some(Path::new(".env")));
//!
//! // Load configuration from TOML, then let the environment override it
//! let loader = ConfigurationLoader::new(Some(Path::new("config/storekit.toml")))
//!     .unwrap()
//!     .with_environment(&env)
//!     .unwrap();
//!
//! println!("Backend: {}", loader.config.persistence.backend);
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{
    BackendKind, Configuration, ConfigurationLoader, LogFormat, LoggingConfig, PersistenceConfig,
};
pub use self::environment::EnvironmentLoader;
