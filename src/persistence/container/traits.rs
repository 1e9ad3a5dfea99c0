//! Container Traits
//!
//! Defines the storage capability every backend implements, and the builder
//! that picks a backend from configuration.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{BackendKind, PersistenceConfig};
use crate::persistence::errors::{StorageError, StorageResult};
use crate::persistence::record::{Record, RecordId};
use crate::persistence::schema::Schema;

/// Core trait for storage containers
///
/// A container owns its handle to exactly one collection or file. All
/// operations are stateless request/response calls against that store.
#[async_trait]
pub trait Container: Send + Sync {
    /// Get the backend type name (e.g., "file", "document")
    fn backend_type(&self) -> &'static str;

    /// Check if the backend is reachable
    async fn is_available(&self) -> bool;

    /// Persist a record and return its identifier.
    ///
    /// A record without identifier is inserted and gets a fresh one. A record
    /// that carries an identifier replaces the stored record with that id;
    /// what happens when none matches is backend specific.
    async fn save(&self, record: Record) -> StorageResult<RecordId>;

    /// Every stored record, in backend-native order
    async fn get_all(&self) -> StorageResult<Vec<Record>>;

    /// The record with this identifier, or `None`
    async fn get_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>>;

    /// Remove the record with this identifier; `false` if none matched
    async fn delete_by_id(&self, id: &RecordId) -> StorageResult<bool>;
}

/// Builder for creating containers from configuration
pub struct ContainerBuilder {
    config: PersistenceConfig,
    collection: String,
    schema: Option<Schema>,
}

impl ContainerBuilder {
    /// Create a new builder for one collection
    pub fn new(config: &PersistenceConfig, collection: &str) -> Self {
        Self {
            config: config.clone(),
            collection: collection.to_string(),
            schema: None,
        }
    }

    /// Override the configured backend
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Enforce a schema.
    ///
    /// Only document backends validate; the file backend ignores the schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Build the container
    pub async fn build(self) -> StorageResult<Arc<dyn Container>> {
        match self.config.backend {
            BackendKind::File => {
                let path = self.config.collection_file(&self.collection);
                let mut container = super::FileContainer::new(path)?;
                if self.config.file_lock_timeout_ms > 0 {
                    container = container
                        .with_lock_timeout(Duration::from_millis(self.config.file_lock_timeout_ms));
                }
                Ok(Arc::new(container))
            }
            BackendKind::Memory => {
                let collection = crate::persistence::collection::MemoryCollection::new(&self.collection);
                Ok(Arc::new(super::DocumentContainer::new(collection, self.schema)))
            }
            #[cfg(feature = "storage-mongodb")]
            BackendKind::MongoDb => {
                let url = self.config.mongo_url.as_deref().ok_or_else(|| {
                    StorageError::configuration("mongo_url is required for the mongodb backend")
                })?;
                let collection = crate::persistence::collection::MongoCollection::connect(
                    url,
                    &self.config.database,
                    &self.collection,
                )
                .await?;
                Ok(Arc::new(super::DocumentContainer::new(collection, self.schema)))
            }
            #[cfg(not(feature = "storage-mongodb"))]
            BackendKind::MongoDb => Err(StorageError::configuration(
                "mongodb backend requires the `storage-mongodb` feature",
            )),
        }
    }
}
