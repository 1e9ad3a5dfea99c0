//! Products DAO

use std::sync::Arc;

use super::models::Product;
use crate::persistence::{Container, Record, RecordId, StorageResult};

/// Product catalog façade. Adds nothing to the container contract beyond
/// typed helpers.
#[derive(Clone)]
pub struct ProductsDao {
    container: Arc<dyn Container>,
}

impl ProductsDao {
    /// Default collection name
    pub const COLLECTION: &'static str = "productos";

    /// Wrap a container
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self { container }
    }

    /// The backing container
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    pub async fn save(&self, record: Record) -> StorageResult<RecordId> {
        self.container.save(record).await
    }

    pub async fn get_all(&self) -> StorageResult<Vec<Record>> {
        self.container.get_all().await
    }

    pub async fn get_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        self.container.get_by_id(id).await
    }

    pub async fn delete_by_id(&self, id: &RecordId) -> StorageResult<bool> {
        self.container.delete_by_id(id).await
    }

    /// Save a typed product; an `id` on it updates the stored product
    pub async fn save_product(&self, product: &Product) -> StorageResult<RecordId> {
        self.save(Record::from_model(product)?).await
    }

    /// Every product, typed
    pub async fn products(&self) -> StorageResult<Vec<Product>> {
        self.get_all()
            .await?
            .iter()
            .map(|r| r.to_model::<Product>())
            .collect()
    }

    /// One product, typed
    pub async fn product(&self, id: &RecordId) -> StorageResult<Option<Product>> {
        self.get_by_id(id)
            .await?
            .map(|r| r.to_model())
            .transpose()
    }
}
