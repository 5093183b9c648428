//! Runtime selection of the document store backend

use aws_config::BehaviorVersion;
use medassist_domain::{
    ports::DocumentStore,
    storage::{Document, DocumentId, Filter, MemoryDocumentStore, StorageError, StoredDocument},
};
use medassist_s3::S3DocumentStore;
use tracing::info;

use crate::config::StoreConfig;

/// The document store picked by configuration
///
/// An enum rather than a trait object: `DocumentStore` returns `impl Future`
/// and is not object safe.
#[derive(Clone)]
pub enum DocumentBackend {
    S3(S3DocumentStore),
    Memory(MemoryDocumentStore),
}

impl DocumentBackend {
    /// Create the configured backend. Reachability is checked later, at startup.
    pub async fn connect(config: &StoreConfig) -> Self {
        match config {
            StoreConfig::S3 { bucket } => {
                let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

                // Path-style addressing keeps MinIO and other S3-compatible services working
                let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
                    .force_path_style(true)
                    .build();
                let client = aws_sdk_s3::Client::from_conf(s3_config);

                Self::S3(S3DocumentStore::new(client, bucket.clone()))
            }
            StoreConfig::Memory => {
                info!("Using in-memory document store, data is lost on restart");
                Self::Memory(MemoryDocumentStore::new())
            }
        }
    }
}

impl From<MemoryDocumentStore> for DocumentBackend {
    fn from(store: MemoryDocumentStore) -> Self {
        Self::Memory(store)
    }
}

impl From<S3DocumentStore> for DocumentBackend {
    fn from(store: S3DocumentStore) -> Self {
        Self::S3(store)
    }
}

impl DocumentStore for DocumentBackend {
    async fn insert(&self, collection: &str, document: Document) -> Result<DocumentId, StorageError> {
        match self {
            Self::S3(store) => store.insert(collection, document).await,
            Self::Memory(store) => store.insert(collection, document).await,
        }
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        match self {
            Self::S3(store) => store.find(collection, filter, limit).await,
            Self::Memory(store) => store.find(collection, filter, limit).await,
        }
    }

    async fn verify_connection(&self) -> Result<(), StorageError> {
        match self {
            Self::S3(store) => store.verify_connection().await,
            Self::Memory(store) => store.verify_connection().await,
        }
    }

    fn close(&self) {
        match self {
            Self::S3(store) => store.close(),
            Self::Memory(store) => store.close(),
        }
    }
}
