//! Errors raised by the backend client.

use rusqlite::ffi::{SQLITE_CONSTRAINT_PRIMARYKEY, SQLITE_CONSTRAINT_UNIQUE};
use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Error, Debug)]
pub enum BackendError {
    /// The underlying database failed.
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// A unique or primary key constraint rejected the write.
    #[error("Duplicate or conflicting row: {0}")]
    Conflict(String),

    /// A row-level rule rejected the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Row not found: {0}")]
    NotFound(String),

    /// The operation needs a signed-in user.
    #[error("No authenticated session")]
    NotAuthenticated,

    /// Sign-up or sign-in failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A column held data that could not be decoded.
    #[error("Corrupted row: {0}")]
    Corrupted(String),

    #[error("Backend lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for BackendError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.extended_code == SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                BackendError::Conflict(msg.unwrap_or_else(|| e.to_string()))
            }
            other => BackendError::Database(other),
        }
    }
}
