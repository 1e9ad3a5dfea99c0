//! File System Container
//!
//! Keeps a whole collection as one JSON array on disk.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use super::traits::Container;
use crate::persistence::atomic::{write_atomic, FileLock};
use crate::persistence::errors::{StorageError, StorageResult};
use crate::persistence::record::{json_type_name, Record, RecordId};

/// Field holding the identifier inside the JSON file
const ID_FIELD: &str = "id";

/// File-backed container
///
/// Every operation loads the whole file, works on the in-memory array and,
/// for writes, rewrites the whole file. Identifiers are increasing integers.
///
/// Without a lock timeout there is no coordination between writers: two
/// overlapping `save` calls (from tasks or processes) may each load the same
/// snapshot, and the later rewrite drops the earlier one's record. Set
/// [`FileContainer::with_lock_timeout`] to serialise read-modify-write
/// cycles through a `<file>.lock` lock file.
#[derive(Debug)]
pub struct FileContainer {
    path: PathBuf,
    lock_timeout: Option<Duration>,
}

impl FileContainer {
    /// Create a container over `path`, creating the file (as `[]`) and its
    /// parent directories if absent.
    pub fn new<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if path.file_name().is_none() {
            return Err(StorageError::configuration(format!(
                "File container path has no filename: {}",
                path.display()
            )));
        }

        // Blocking fs: constructor is sync
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            std::fs::write(&path, "[]")?;
        }

        Ok(Self {
            path,
            lock_timeout: None,
        })
    }

    /// Hold a lock file for each read-modify-write cycle, waiting at most
    /// `timeout` to acquire it.
    ///
    /// A lock file left by a crashed writer blocks every locked write until
    /// it is older than [`STALE_LOCK_AGE`](crate::persistence::atomic::STALE_LOCK_AGE),
    /// after which the next writer reclaims it.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock timeout, if locking is enabled
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout
    }

    async fn lock(&self) -> StorageResult<Option<FileLock>> {
        match self.lock_timeout {
            Some(timeout) => Ok(Some(FileLock::acquire(&self.path, timeout).await?)),
            None => Ok(None),
        }
    }

    async fn load(&self) -> StorageResult<Vec<Record>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items = match serde_json::from_str::<Value>(&content)? {
            Value::Array(items) => items,
            other => {
                return Err(StorageError::serialization(format!(
                    "{} must hold a JSON array, found {}",
                    self.path.display(),
                    json_type_name(&other)
                )))
            }
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(document) => Ok(Record::from_document(document, ID_FIELD)),
                other => Err(StorageError::serialization(format!(
                    "{} holds a non-object entry ({})",
                    self.path.display(),
                    json_type_name(&other)
                ))),
            })
            .collect()
    }

    async fn store(&self, records: Vec<Record>) -> StorageResult<()> {
        let documents: Vec<Value> = records
            .into_iter()
            .map(|r| {
                let mut document = r.into_document(ID_FIELD);
                let numeric = match document.get(ID_FIELD) {
                    Some(Value::String(id)) => integer_id(id),
                    _ => None,
                };
                if let Some(n) = numeric {
                    document.insert(ID_FIELD.to_string(), Value::from(n));
                }
                Value::Object(document)
            })
            .collect();
        let content = serde_json::to_vec_pretty(&documents)?;
        write_atomic(&self.path, &content).await
    }

    fn next_id(&self, records: &[Record]) -> StorageResult<RecordId> {
        let max = records
            .iter()
            .filter_map(|r| r.id())
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next = max.checked_add(1).ok_or_else(|| {
            StorageError::Backend(format!(
                "{} has no integer id left after {}",
                self.path.display(),
                max
            ))
        })?;
        Ok(RecordId::new(next.to_string()))
    }
}

/// Canonical decimal ids are stored as JSON numbers, anything else as a string
fn integer_id(id: &str) -> Option<u64> {
    id.parse::<u64>().ok().filter(|n| n.to_string() == id)
}

#[async_trait]
impl Container for FileContainer {
    fn backend_type(&self) -> &'static str {
        "file"
    }

    async fn is_available(&self) -> bool {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::metadata(parent)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn save(&self, mut record: Record) -> StorageResult<RecordId> {
        let _lock = self.lock().await?;
        let mut records = self.load().await?;

        let id = match record.id().cloned() {
            Some(id) => {
                match records.iter().position(|r| r.id() == Some(&id)) {
                    Some(index) => records[index] = record,
                    None => records.push(record),
                }
                id
            }
            None => {
                let id = self.next_id(&records)?;
                record.set_id(Some(id.clone()));
                records.push(record);
                id
            }
        };

        self.store(records).await?;
        tracing::info!(path = %self.path.display(), %id, "saved record");
        Ok(id)
    }

    async fn get_all(&self) -> StorageResult<Vec<Record>> {
        let records = self.load().await?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    async fn get_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        let records = self.load().await?;
        Ok(records.into_iter().find(|r| r.id() == Some(id)))
    }

    async fn delete_by_id(&self, id: &RecordId) -> StorageResult<bool> {
        let _lock = self.lock().await?;
        let mut records = self.load().await?;

        let Some(index) = records.iter().position(|r| r.id() == Some(id)) else {
            return Ok(false);
        };

        records.remove(index);
        self.store(records).await?;
        tracing::info!(path = %self.path.display(), %id, "deleted record");
        Ok(true)
    }
}
