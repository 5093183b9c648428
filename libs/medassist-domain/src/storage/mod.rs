//! Document storage domain module
//!
//! Defines the persistence gateway port and the document model it speaks.
//! Documents are schemaless JSON objects grouped into named collections,
//! addressed by a server-generated `DocumentId`.

mod document;
mod error;
mod ids;
mod memory;
mod ports;

pub use document::{Document, Filter, StoredDocument};
pub use error::StorageError;
pub use ids::DocumentId;
pub use memory::MemoryDocumentStore;
pub use ports::DocumentStore;
