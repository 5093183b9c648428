//! Port (trait definition) for the persistence gateway
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` to keep static dispatch.

use std::future::Future;

use super::{Document, DocumentId, Filter, StorageError, StoredDocument};

/// Port for document storage operations
///
/// Implementations must:
/// - Generate the `DocumentId` of inserted documents
/// - Return `find` results in insertion order
/// - Be safe to share between many concurrent request tasks
/// - Fail every operation with `StorageError::Closed` once `close` was called
pub trait DocumentStore: Send + Sync {
    /// Insert a document into a collection and return its generated id
    ///
    /// # Errors
    ///
    /// Returns `StorageError::OperationFailed` if the write fails
    fn insert(
        &self,
        collection: &str,
        document: Document,
    ) -> impl Future<Output = Result<DocumentId, StorageError>> + Send;

    /// Find at most `limit` documents of a collection matching `filter`
    ///
    /// Documents come back in insertion order. No match is an empty vector.
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, StorageError>> + Send;

    /// Check that the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` (or `Closed`) when it is not
    fn verify_connection(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Release the handle. Idempotent.
    fn close(&self);
}
