//! Domain DAOs
//!
//! Each DAO wraps exactly one [`Container`](crate::persistence::Container)
//! chosen at construction and forwards to it, adding entity defaults and
//! lookups. Container errors reach the caller unchanged.
//!
//! [`Daos::from_config`] wires the three DAOs the way the storefront runs
//! them: products and carts on the configured backend, users on a
//! schema-validated document container.

use std::sync::Arc;

use crate::config::{BackendKind, PersistenceConfig};
use crate::persistence::{Container, ContainerBuilder, Schema, StorageResult};

pub mod carts;
pub mod models;
pub mod products;
pub mod users;

pub use carts::CartsDao;
pub use models::{Cart, Product, User};
pub use products::ProductsDao;
pub use users::UsersDao;

/// The storefront's DAOs, built from one configuration
#[derive(Clone)]
pub struct Daos {
    pub products: ProductsDao,
    pub carts: CartsDao,
    pub users: UsersDao,
}

impl Daos {
    /// Build every DAO from configuration.
    ///
    /// Users always get [`Schema::users`] on a document container: MongoDB
    /// when a `mongo_url` is configured, the in-memory collection otherwise.
    /// Carts on a document backend are validated with [`Schema::carts`];
    /// products are never validated.
    pub async fn from_config(config: &PersistenceConfig) -> StorageResult<Self> {
        let products = ContainerBuilder::new(config, ProductsDao::COLLECTION)
            .build()
            .await?;

        let carts = ContainerBuilder::new(config, CartsDao::COLLECTION)
            .with_schema(Schema::carts())
            .build()
            .await?;

        let users = ContainerBuilder::new(config, UsersDao::COLLECTION)
            .with_backend(Self::users_backend(config))
            .with_schema(Schema::users())
            .build()
            .await?;

        tracing::info!(
            backend = %config.backend,
            users_backend = users.backend_type(),
            "persistence ready"
        );

        Ok(Self {
            products: ProductsDao::new(products),
            carts: CartsDao::new(carts),
            users: UsersDao::new(users),
        })
    }

    fn users_backend(config: &PersistenceConfig) -> BackendKind {
        if config.mongo_url.is_none() {
            return BackendKind::Memory;
        }
        if cfg!(feature = "storage-mongodb") {
            BackendKind::MongoDb
        } else {
            tracing::warn!("mongo_url is set but the `storage-mongodb` feature is off; users are kept in memory");
            BackendKind::Memory
        }
    }

    /// Build the DAOs over fresh in-memory collections
    pub async fn in_memory() -> StorageResult<Self> {
        let config = PersistenceConfig {
            backend: BackendKind::Memory,
            ..Default::default()
        };
        Self::from_config(&config).await
    }

    /// Wrap already-built containers
    pub fn from_parts(
        products: Arc<dyn Container>,
        carts: Arc<dyn Container>,
        users: Arc<dyn Container>,
    ) -> Self {
        Self {
            products: ProductsDao::new(products),
            carts: CartsDao::new(carts),
            users: UsersDao::new(users),
        }
    }
}
