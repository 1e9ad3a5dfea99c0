//! Records and record identifiers

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::errors::{StorageError, StorageResult};

/// Field name typed models use for the record identifier
pub const MODEL_ID_FIELD: &str = "id";

/// Backend-assigned record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an identifier string
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an identifier out of a stored JSON value.
    ///
    /// Strings are taken verbatim, integers are rendered in decimal.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A persisted or to-be-persisted item: named fields plus an optional id.
///
/// Records handed out by containers are detached copies; mutating one never
/// touches storage until it is passed back to `save`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    id: Option<RecordId>,
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record without identifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from a field map
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { id: None, fields }
    }

    /// Create a record from a JSON object.
    ///
    /// Any value other than an object is rejected.
    pub fn from_value(value: Value) -> StorageResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self::from_fields(fields)),
            other => Err(StorageError::serialization(format!(
                "Record must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Split a stored document into a record, taking the id from `id_field`.
    pub fn from_document(mut document: Map<String, Value>, id_field: &str) -> Self {
        let id = document
            .remove(id_field)
            .and_then(|v| RecordId::from_value(&v));
        Self {
            id,
            fields: document,
        }
    }

    /// Flatten into a stored document, writing the id under `id_field`.
    pub fn into_document(self, id_field: &str) -> Map<String, Value> {
        let mut document = Map::with_capacity(self.fields.len() + 1);
        if let Some(id) = self.id {
            document.insert(id_field.to_string(), Value::String(id.0));
        }
        for (key, value) in self.fields {
            if key != id_field {
                document.insert(key, value);
            }
        }
        document
    }

    /// Build a record from a serializable model.
    ///
    /// A string or integer `id` field becomes the record identifier.
    pub fn from_model<T: Serialize>(model: &T) -> StorageResult<Self> {
        let value = serde_json::to_value(model)?;
        match value {
            Value::Object(fields) => {
                let mut record = Self::from_document(fields, MODEL_ID_FIELD);
                record.fields.remove(MODEL_ID_FIELD);
                Ok(record)
            }
            other => Err(StorageError::serialization(format!(
                "Model must serialize to a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Deserialize into a model, exposing the identifier as `id`.
    pub fn to_model<T: DeserializeOwned>(&self) -> StorageResult<T> {
        let document = self.clone().into_document(MODEL_ID_FIELD);
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    /// Set the identifier, consuming the record
    pub fn with_id<I: Into<RecordId>>(mut self, id: I) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Get the identifier, if persisted
    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    /// Replace the identifier
    pub fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get a text field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Set a field, returning the previous value
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, field: K, value: V) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Whether the field is present (even if null)
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// All fields, without the identifier
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Take the fields, dropping the identifier
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Mutable access to the fields
    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Number of fields, without the identifier
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Human name of a JSON value type, for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
