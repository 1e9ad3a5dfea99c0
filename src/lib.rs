//! storekit - Pluggable persistence for a small e-commerce backend
//!
//! storekit provides a set of feature-gated modules:
//!
//! - **`config`** - Configuration and environment loading
//! - **`observability`** - Structured logging setup
//! - **`persistence`** - The `Container` abstraction with file, MongoDB and
//!   in-memory backends, plus optional schema validation
//! - **`dao`** - Products, carts and users DAOs over any container
//! - **`accounts`** - Sign-up and login on top of the users DAO
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! storekit = { version = "0.3", features = ["persistence"] }
//! # MongoDB support:
//! storekit = { version = "0.3", features = ["persistence", "storage-mongodb"] }
//! # Or enable everything:
//! storekit = { version = "0.3", features = ["all"] }
//! ```
//!
//! # Example: wiring from configuration
//!
//! ```no_run
//! use storekit::config::{ConfigurationLoader, EnvironmentLoader};
//! use storekit::dao::Daos;
//! use storekit::observability::init_logging;
//! use std::path::Path;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let env = EnvironmentLoader::new(None);
//! let loader = ConfigurationLoader::new(Some(Path::new("config/storekit.toml")))?
//!     .with_environment(&env)?;
//! let config = &loader.config;
//!
//! init_logging(&config.logging);
//!
//! let daos = Daos::from_config(&config.persistence).await?;
//! let cart = daos.carts.create().await?;
//! daos.carts.add_product(&cart, serde_json::json!("1")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example: a single container
//!
//! ```no_run
//! use storekit::persistence::{Container, FileContainer, Record};
//!
//! # async fn demo() -> storekit::persistence::StorageResult<()> {
//! let productos = FileContainer::new("./DB/productos.json")?;
//! let id = productos
//!     .save(Record::from_value(serde_json::json!({"title": "Lapiz", "price": 120}))?)
//!     .await?;
//! assert!(productos.get_by_id(&id).await?.is_some());
//! # Ok(())
//! # }
//! ```

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Logging setup (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Storage containers (enabled with the `persistence` feature)
#[cfg(feature = "persistence")]
pub mod persistence;

/// Domain DAOs (enabled with the `persistence` feature)
#[cfg(feature = "persistence")]
pub mod dao;

/// Account flows (enabled with the `accounts` feature)
#[cfg(feature = "accounts")]
pub mod accounts;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "config")]
    pub use crate::config::{BackendKind, Configuration, ConfigurationLoader, EnvironmentLoader};

    #[cfg(feature = "observability")]
    pub use crate::observability::init_logging;

    #[cfg(feature = "persistence")]
    pub use crate::persistence::{
        Container, ContainerBuilder, DocumentContainer, FileContainer, MemoryCollection, Record,
        RecordId, Schema, StorageError, StorageResult,
    };

    #[cfg(feature = "persistence")]
    pub use crate::dao::{Cart, CartsDao, Daos, Product, ProductsDao, User, UsersDao};

    #[cfg(feature = "accounts")]
    pub use crate::accounts::{AccountService, LogNotifier, NewUser, RegisterOutcome, SignupNotifier};
}
