//! Account flow errors.

use thiserror::Error;

use crate::persistence::StorageError;

/// Errors raised by [`AccountService`](super::AccountService).
///
/// A wrong password or unknown email is not an error; `authenticate`
/// returns `Ok(None)` for both.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The users container failed, including schema validation failures.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Argon2 could not hash the password.
    #[error("Password hashing failed")]
    PasswordHash,

    /// A stored user does not match the user model.
    #[error("Invalid user record: {0}")]
    InvalidRecord(String),
}

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;
