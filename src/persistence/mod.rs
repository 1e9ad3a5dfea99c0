//! Persistence Layer
//!
//! Generic record storage behind one capability trait:
//! - [`container::Container`]: `save`, `get_all`, `get_by_id`, `delete_by_id`
//! - a file-backed container keeping a JSON array on disk
//! - a document-store container, schema-less or schema-validated, over
//!   MongoDB or an in-memory collection
//!
//! Misses are values (`None`/`false`), failures are [`StorageError`]s and are
//! never retried or masked.

pub mod atomic;
pub mod collection;
pub mod container;
pub mod errors;
pub mod record;
pub mod schema;

// Re-export key types for convenience
pub use collection::{DocumentCollection, MemoryCollection};
pub use container::{Container, ContainerBuilder, DocumentContainer, FileContainer};
pub use errors::{FieldError, FieldErrorReason, StorageError, StorageResult, ValidationError};
pub use record::{Record, RecordId};
pub use schema::{FieldKind, FieldSpec, Schema};

#[cfg(feature = "storage-mongodb")]
pub use collection::MongoCollection;
