//! In-process document collection
//!
//! Behaves like a document database collection (generated hex ids, upsert on
//! replace, natural insertion order) without any server. Used by the
//! `memory` persistence mode and by tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::DocumentCollection;
use crate::persistence::errors::{StorageError, StorageResult};
use crate::persistence::record::{Record, RecordId};

/// Length of generated ids, matching 12-byte ObjectIds in hex
const ID_LEN: usize = 24;

/// In-memory document collection
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<(RecordId, Map<String, Value>)>>,
    available: AtomicBool,
}

impl MemoryCollection {
    /// Create an empty collection
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            documents: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the database going away (`false`) or coming back (`true`).
    ///
    /// While unavailable every operation fails with `StorageError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::unavailable(format!(
                "collection `{}` is unreachable",
                self.name
            )))
        }
    }

    fn generate_id() -> RecordId {
        let hex = Uuid::new_v4().simple().to_string();
        RecordId::new(&hex[..ID_LEN])
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn ping(&self) -> bool {
        self.check_available().is_ok()
    }

    async fn insert_one(&self, document: Map<String, Value>) -> StorageResult<RecordId> {
        self.check_available()?;
        let id = Self::generate_id();
        self.documents.write().await.push((id.clone(), document));
        Ok(id)
    }

    async fn replace_one(&self, id: &RecordId, document: Map<String, Value>) -> StorageResult<()> {
        self.check_available()?;
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|(existing, _)| existing == id) {
            Some(entry) => entry.1 = document,
            None => documents.push((id.clone(), document)),
        }
        Ok(())
    }

    async fn find_all(&self) -> StorageResult<Vec<Record>> {
        self.check_available()?;
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .map(|(id, document)| Record::from_fields(document.clone()).with_id(id.clone()))
            .collect())
    }

    async fn find_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        self.check_available()?;
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(id, document)| Record::from_fields(document.clone()).with_id(id.clone())))
    }

    async fn delete_one(&self, id: &RecordId) -> StorageResult<bool> {
        self.check_available()?;
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|(existing, _)| existing != id);
        Ok(documents.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_hex_ids() {
        let collection = MemoryCollection::new("productos");
        let a = collection.insert_one(doc(json!({"title": "a"}))).await.unwrap();
        let b = collection.insert_one(doc(json!({"title": "b"}))).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), ID_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(collection.name(), "productos");
    }

    #[tokio::test]
    async fn test_replace_upserts() {
        let collection = MemoryCollection::new("productos");
        let id = RecordId::new("custom-id");

        collection
            .replace_one(&id, doc(json!({"title": "a"})))
            .await
            .unwrap();
        collection
            .replace_one(&id, doc(json!({"title": "b"})))
            .await
            .unwrap();

        let all = collection.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].get_str("title"), Some("b"));
        assert_eq!(all[0].id(), Some(&id));
    }

    #[tokio::test]
    async fn test_unavailable_collection_fails_every_operation() {
        let collection = MemoryCollection::new("productos");
        collection.set_available(false);

        assert!(!collection.ping().await);
        assert!(matches!(
            collection.find_all().await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(collection.insert_one(Map::new()).await.is_err());

        collection.set_available(true);
        assert!(collection.ping().await);
        assert!(collection.find_all().await.unwrap().is_empty());
    }
}
