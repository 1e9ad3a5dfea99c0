//! Document-Store Container
//!
//! One container type for both document-store variants: schema-less when
//! built without a [`Schema`], schema-validated when built with one.

use async_trait::async_trait;

use super::traits::Container;
use crate::persistence::collection::DocumentCollection;
use crate::persistence::errors::StorageResult;
use crate::persistence::record::{Record, RecordId};
use crate::persistence::schema::Schema;

/// Container over a document database collection
pub struct DocumentContainer<C> {
    collection: C,
    schema: Option<Schema>,
}

impl<C: DocumentCollection> DocumentContainer<C> {
    /// Create a container over `collection`, validating writes against
    /// `schema` when one is given.
    pub fn new(collection: C, schema: Option<Schema>) -> Self {
        Self { collection, schema }
    }

    /// Create a schema-less container
    pub fn schemaless(collection: C) -> Self {
        Self::new(collection, None)
    }

    /// Create a schema-validated container
    pub fn validated(collection: C, schema: Schema) -> Self {
        Self::new(collection, Some(schema))
    }

    /// Get the schema, if writes are validated
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Get the underlying collection driver
    pub fn collection(&self) -> &C {
        &self.collection
    }
}

#[async_trait]
impl<C: DocumentCollection> Container for DocumentContainer<C> {
    fn backend_type(&self) -> &'static str {
        "document"
    }

    async fn is_available(&self) -> bool {
        self.collection.ping().await
    }

    async fn save(&self, record: Record) -> StorageResult<RecordId> {
        // Validation happens before any write reaches the collection
        let record = match &self.schema {
            Some(schema) => schema.validate(record).map_err(|e| {
                tracing::debug!(collection = self.collection.name(), error = %e, "rejected record");
                e
            })?,
            None => record,
        };

        let id = match record.id().cloned() {
            Some(id) => {
                self.collection.replace_one(&id, record.into_fields()).await?;
                id
            }
            None => self.collection.insert_one(record.into_fields()).await?,
        };

        tracing::info!(collection = self.collection.name(), %id, "saved record");
        Ok(id)
    }

    async fn get_all(&self) -> StorageResult<Vec<Record>> {
        let records = self.collection.find_all().await?;
        tracing::debug!(
            collection = self.collection.name(),
            count = records.len(),
            "loaded records"
        );
        Ok(records)
    }

    async fn get_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        self.collection.find_by_id(id).await
    }

    async fn delete_by_id(&self, id: &RecordId) -> StorageResult<bool> {
        let deleted = self.collection.delete_one(id).await?;
        if deleted {
            tracing::info!(collection = self.collection.name(), %id, "deleted record");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::collection::MemoryCollection;
    use crate::persistence::errors::StorageError;
    use serde_json::{json, Value};

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    fn user(email: &str) -> Record {
        record(json!({
            "email": email,
            "password": "$argon2id$v=19$hash",
            "name": "Ana",
            "telephone": 1155550000,
            "adress": "Calle 1",
            "age": 30
        }))
    }

    #[tokio::test]
    async fn test_schemaless_save_then_get() {
        let container = DocumentContainer::schemaless(MemoryCollection::new("productos"));
        let input = record(json!({"title": "Lapiz", "anything": [1, 2]}));

        let id = container.save(input.clone()).await.unwrap();
        let stored = container.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored, input.with_id(id));
        assert!(container.schema().is_none());
        assert!(container.is_available().await);
    }

    #[tokio::test]
    async fn test_empty_store_and_delete() {
        let container = DocumentContainer::schemaless(MemoryCollection::new("productos"));
        assert!(container.get_all().await.unwrap().is_empty());

        let id = container.save(record(json!({"title": "a"}))).await.unwrap();
        container.save(record(json!({"title": "b"}))).await.unwrap();

        assert!(container.delete_by_id(&id).await.unwrap());
        assert_eq!(container.get_all().await.unwrap().len(), 1);
        assert!(!container.delete_by_id(&id).await.unwrap());
        assert_eq!(container.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_with_id_replaces() {
        let container = DocumentContainer::schemaless(MemoryCollection::new("productos"));
        let id = container.save(record(json!({"title": "a"}))).await.unwrap();

        let updated = record(json!({"title": "b"})).with_id(id.clone());
        assert_eq!(container.save(updated.clone()).await.unwrap(), id);
        assert_eq!(container.get_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_validated_save_then_get() {
        let container = DocumentContainer::validated(MemoryCollection::new("usuarios"), Schema::users());
        let input = user("a@x.com");

        let id = container.save(input.clone()).await.unwrap();
        let stored = container.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored, input.with_id(id));
    }

    #[tokio::test]
    async fn test_validation_failure_writes_nothing() {
        let container = DocumentContainer::validated(MemoryCollection::new("usuarios"), Schema::users());
        container.save(user("first@x.com")).await.unwrap();
        let before = container.get_all().await.unwrap();

        let mut incomplete = user("second@x.com");
        incomplete.remove("adress");
        let err = container.save(incomplete).await.unwrap_err();

        match err {
            StorageError::Validation(v) => assert_eq!(v.fields(), vec!["adress"]),
            other => panic!("expected validation error, got {other}"),
        }
        assert_eq!(container.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unavailable_backend_propagates() {
        let container = DocumentContainer::schemaless(MemoryCollection::new("productos"));
        container.collection().set_available(false);

        assert!(!container.is_available().await);
        let err = container.save(record(json!({"title": "a"}))).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(container.get_by_id(&RecordId::new("x")).await.is_err());
    }
}
