//! MongoDB Collection Driver
//!
//! Backs a document container with one MongoDB (or DocumentDB) collection.
//!
//! ## Usage
//!
//! Enable the `storage-mongodb` feature in Cargo.toml:
//!
//! ```toml
//! storekit = { version = "0.3", features = ["storage-mongodb"] }
//! ```
//!
//! ```rust,no_run
//! use storekit::persistence::collection::MongoCollection;
//! use storekit::persistence::container::DocumentContainer;
//! use storekit::persistence::schema::Schema;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let collection = MongoCollection::connect(
//!         "mongodb://localhost:27017",
//!         "ecommerce",
//!         "usuarios",
//!     )
//!     .await?;
//!     let users = DocumentContainer::new(collection, Some(Schema::users()));
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::ClientOptions,
    Client, Collection,
};
use serde_json::{Map, Value};

use super::DocumentCollection;
use crate::persistence::errors::{StorageError, StorageResult};
use crate::persistence::record::{Record, RecordId};

const ID_FIELD: &str = "_id";

/// MongoDB collection driver
pub struct MongoCollection {
    client: Client,
    collection: Collection<Document>,
    database_name: String,
    collection_name: String,
}

impl MongoCollection {
    /// Connect to a collection
    ///
    /// # Arguments
    /// * `connection_string` - MongoDB connection string
    /// * `database` - Database name
    /// * `collection` - Collection name
    pub async fn connect(
        connection_string: &str,
        database: &str,
        collection: &str,
    ) -> StorageResult<Self> {
        let client_options = ClientOptions::parse(connection_string)
            .await
            .map_err(|e| StorageError::configuration(e.to_string()))?;

        let client = Client::with_options(client_options)
            .map_err(|e| StorageError::unavailable(e.to_string()))?;

        let coll = client.database(database).collection::<Document>(collection);

        tracing::debug!(database, collection, "connected mongodb collection");

        Ok(Self {
            client,
            collection: coll,
            database_name: database.to_string(),
            collection_name: collection.to_string(),
        })
    }

    /// Get the MongoDB client (for advanced operations)
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the collection (for advanced operations)
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }
}

/// ObjectId-shaped ids match as ObjectIds, anything else as a plain string
fn id_filter(id: &RecordId) -> Document {
    match ObjectId::parse_str(id.as_str()) {
        Ok(oid) => doc! { ID_FIELD: oid },
        Err(_) => doc! { ID_FIELD: id.as_str() },
    }
}

fn to_bson_document(document: Map<String, Value>) -> StorageResult<Document> {
    mongodb::bson::to_document(&document).map_err(|e| StorageError::serialization(e.to_string()))
}

fn to_record(mut document: Document) -> Record {
    let id = match document.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => Some(RecordId::new(oid.to_hex())),
        Some(Bson::String(s)) => Some(RecordId::new(s)),
        Some(other) => RecordId::from_value(&other.into_relaxed_extjson()),
        None => None,
    };

    let fields = match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut record = Record::from_fields(fields);
    record.set_id(id);
    record
}

fn driver_error(err: mongodb::error::Error) -> StorageError {
    use mongodb::error::ErrorKind;

    match err.kind.as_ref() {
        ErrorKind::Write(_) | ErrorKind::Command(_) => StorageError::Backend(err.to_string()),
        _ => StorageError::Unavailable(err.to_string()),
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    fn name(&self) -> &str {
        &self.collection_name
    }

    async fn ping(&self) -> bool {
        self.client
            .database(&self.database_name)
            .run_command(doc! { "ping": 1 })
            .await
            .is_ok()
    }

    async fn insert_one(&self, document: Map<String, Value>) -> StorageResult<RecordId> {
        let document = to_bson_document(document)?;

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(driver_error)?;

        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(RecordId::new(oid.to_hex())),
            other => RecordId::from_value(&other.into_relaxed_extjson()).ok_or_else(|| {
                StorageError::serialization("Inserted document has an unusable _id")
            }),
        }
    }

    async fn replace_one(&self, id: &RecordId, document: Map<String, Value>) -> StorageResult<()> {
        let document = to_bson_document(document)?;

        self.collection
            .replace_one(id_filter(id), document)
            .upsert(true)
            .await
            .map_err(driver_error)?;

        Ok(())
    }

    async fn find_all(&self) -> StorageResult<Vec<Record>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(driver_error)?;

        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(driver_error)? {
            records.push(to_record(document));
        }

        Ok(records)
    }

    async fn find_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        let document = self
            .collection
            .find_one(id_filter(id))
            .await
            .map_err(driver_error)?;

        Ok(document.map(to_record))
    }

    async fn delete_one(&self, id: &RecordId) -> StorageResult<bool> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(driver_error)?;

        Ok(result.deleted_count > 0)
    }
}
