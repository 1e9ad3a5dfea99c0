//! Document collection drivers
//!
//! [`DocumentCollection`] is the seam between a
//! [`DocumentContainer`](crate::persistence::container::DocumentContainer)
//! and the database it talks to. Documents cross it as JSON maps without
//! their identifier; the driver owns id assignment.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::errors::StorageResult;
use super::record::{Record, RecordId};

mod memory;

pub use memory::MemoryCollection;

#[cfg(feature = "storage-mongodb")]
mod mongodb_collection;

#[cfg(feature = "storage-mongodb")]
pub use mongodb_collection::MongoCollection;

/// One named collection in a document database
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Check if the database answers
    async fn ping(&self) -> bool;

    /// Insert a new document and return the id the database assigned
    async fn insert_one(&self, document: Map<String, Value>) -> StorageResult<RecordId>;

    /// Replace the document with `id`, inserting it under `id` if absent
    async fn replace_one(&self, id: &RecordId, document: Map<String, Value>) -> StorageResult<()>;

    /// Every document, in natural order
    async fn find_all(&self) -> StorageResult<Vec<Record>>;

    /// The document with `id`; ids the database cannot match are misses
    async fn find_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>>;

    /// Delete the document with `id`; `false` if none matched
    async fn delete_one(&self, id: &RecordId) -> StorageResult<bool>;
}
