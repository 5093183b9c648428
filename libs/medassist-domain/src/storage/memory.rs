//! In-process document store
//!
//! Backs `DOCUMENT_STORE=memory` deployments and every test that needs a real
//! `DocumentStore`. Clones share the same collections and closed flag.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::{Document, DocumentId, DocumentStore, Filter, StorageError, StoredDocument};

#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<StoredDocument>>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.is_closed() {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert(
        &self,
        collection: &str,
        document: Document,
    ) -> impl Future<Output = Result<DocumentId, StorageError>> + Send {
        let result = self.ensure_open().map(|()| {
            let id = DocumentId::new();
            self.collections
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(collection.to_string())
                .or_default()
                .push(StoredDocument { id, body: document });
            id
        });

        async move { result }
    }

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, StorageError>> + Send {
        let result = self.ensure_open().map(|()| {
            self.collections
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(collection)
                .map(|documents| {
                    documents
                        .iter()
                        .filter(|stored| filter.matches(&stored.body))
                        .take(limit)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        });

        async move { result }
    }

    fn verify_connection(&self) -> impl Future<Output = Result<(), StorageError>> + Send {
        let result = self.ensure_open();
        async move { result }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[tokio::test]
    async fn test_find_returns_insertion_order() {
        let store = MemoryDocumentStore::new();
        for n in 0..5 {
            store.insert("items", doc(json!({"n": n}))).await.unwrap();
        }

        let found = store.find("items", &Filter::new(), 10).await.unwrap();
        let ns: Vec<i64> = found.iter().map(|d| d.body["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_find_applies_filter_and_limit() {
        let store = MemoryDocumentStore::new();
        for n in 0..10 {
            let owner = if n % 2 == 0 { "even" } else { "odd" };
            store
                .insert("items", doc(json!({"owner": owner, "n": n})))
                .await
                .unwrap();
        }

        let found = store
            .find("items", &Filter::new().equals("owner", "odd"), 3)
            .await
            .unwrap();
        let ns: Vec<i64> = found.iter().map(|d| d.body["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryDocumentStore::new();
        let found = store.find("missing", &Filter::new(), 10).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_fails_later_calls() {
        let store = MemoryDocumentStore::new();
        assert!(store.verify_connection().await.is_ok());

        store.close();
        store.close();

        assert_eq!(store.verify_connection().await, Err(StorageError::Closed));
        assert_eq!(
            store.insert("items", Document::new()).await,
            Err(StorageError::Closed)
        );
        assert_eq!(store.count("items"), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryDocumentStore::new();
        let clone = store.clone();

        clone.insert("items", Document::new()).await.unwrap();
        assert_eq!(store.count("items"), 1);

        clone.close();
        assert!(store.is_closed());
    }
}
