//! Error types for the persistence layer

use std::fmt;
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Error types for container operations.
///
/// Lookup misses are not errors: they surface as `Ok(None)` or `Ok(false)`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or did not answer
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The record violates the container schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// IO error during storage operation
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend was reached but rejected the operation
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Create an unavailable error
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error was raised by schema validation
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: FieldErrorReason,
}

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorReason {
    /// Required field absent, null, or an empty string
    Missing,
    /// Value could not be cast to the declared kind
    Mistyped { expected: &'static str },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FieldErrorReason::Missing => write!(f, "`{}` is required", self.field),
            FieldErrorReason::Mistyped { expected } => {
                write!(f, "`{}` must be a {}", self.field, expected)
            }
        }
    }
}

/// Schema violation, listing every offending field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Names of the rejected fields, in schema order
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
