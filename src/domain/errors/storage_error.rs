//! Session storage error types.

use thiserror::Error;

/// Key/value storage error variants.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access storage: {0}")]
    AccessFailed(String),

    #[error("failed to read value: {0}")]
    RetrievalFailed(String),

    #[error("failed to store value: {0}")]
    StorageFailed(String),

    #[error("failed to delete value: {0}")]
    DeletionFailed(String),

    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}
