//! Domain errors for storage operations

use thiserror::Error;

/// Errors that can occur while talking to the document store
///
/// These abstract away the backend (no AWS SDK error types here); adapters
/// convert their own errors into one of these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store handle was closed during shutdown
    #[error("Document store is closed")]
    Closed,

    /// The backend could not be reached
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// A read or write operation failed in the backend
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    /// A document could not be encoded or decoded
    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl StorageError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn operation_failed(msg: impl Into<String>) -> Self {
        Self::OperationFailed(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
