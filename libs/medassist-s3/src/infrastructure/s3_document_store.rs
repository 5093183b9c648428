//! S3 Document Store Implementation
//!
//! This module implements the `DocumentStore` port using AWS S3 (or any
//! S3-compatible service such as MinIO) as the backend. It handles all S3
//! operations and converts AWS errors to domain errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client};
use bytes::Bytes;
use medassist_domain::{
    ports::DocumentStore,
    storage::{Document, DocumentId, Filter, StorageError, StoredDocument},
};
use tracing::{debug, error, info, instrument, warn};

/// S3-based implementation of the DocumentStore port
///
/// Each document is one JSON object at `<collection>/<document-id>.json`.
/// Document ids are UUID v7, so listing a collection prefix (which S3 does in
/// ascending key order) yields documents in insertion order.
///
/// ## Error Handling
///
/// Connectivity failures become `StorageError::Unavailable`, failed reads and
/// writes `StorageError::OperationFailed`. `find` logs and skips objects that
/// are not JSON objects, so one bad object cannot hide the rest of a
/// collection.
#[derive(Clone)]
pub struct S3DocumentStore {
    client: Client,
    bucket: String,
    closed: Arc<AtomicBool>,
}

impl S3DocumentStore {
    /// Create a new S3 document store
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aws_sdk_s3::Client;
    /// use medassist_s3::S3DocumentStore;
    ///
    /// # async fn example() {
    /// let config = aws_config::load_from_env().await;
    /// let s3_client = Client::new(&config);
    /// let store = S3DocumentStore::new(s3_client, "medassist".to_string());
    /// # }
    /// ```
    pub fn new(client: Client, bucket: String) -> Self {
        info!(bucket = %bucket, "Initializing S3DocumentStore");
        Self {
            client,
            bucket,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

/// S3 key of a document
pub fn document_key(collection: &str, id: &DocumentId) -> String {
    format!("{}{}.json", collection_prefix(collection), id)
}

fn collection_prefix(collection: &str) -> String {
    format!("{collection}/")
}

fn parse_document_key(prefix: &str, key: &str) -> Option<DocumentId> {
    key.strip_prefix(prefix)?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

async fn fetch_document(client: &Client, bucket: &str, key: &str) -> Result<Document, StorageError> {
    let output = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|err| {
            warn!(key = %key, error = %DisplayErrorContext(&err), "Failed to get document from S3");
            StorageError::operation_failed(format!(
                "S3 get_object failed for key '{}': {}",
                key,
                DisplayErrorContext(&err)
            ))
        })?;

    let data = output.body.collect().await.map_err(|err| {
        error!(key = %key, error = ?err, "Failed to read S3 object body");
        StorageError::operation_failed(format!(
            "Failed to read S3 object body for key '{}': {}",
            key, err
        ))
    })?;

    serde_json::from_slice::<Document>(&data.into_bytes())
        .map_err(|err| StorageError::malformed(format!("'{}' is not a JSON object: {}", key, err)))
}

impl DocumentStore for S3DocumentStore {
    #[instrument(skip(self, document), fields(bucket = %self.bucket))]
    fn insert(
        &self,
        collection: &str,
        document: Document,
    ) -> impl std::future::Future<Output = Result<DocumentId, StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let id = DocumentId::new();
        let key = document_key(collection, &id);
        let open = self.ensure_open();

        async move {
            open?;

            let body = serde_json::to_vec(&document)
                .map_err(|err| StorageError::malformed(err.to_string()))?;

            debug!(key = %key, size = body.len(), "Saving document to S3");

            match client
                .put_object()
                .bucket(&bucket)
                .key(&key)
                .content_type("application/json")
                .body(ByteStream::from(Bytes::from(body)))
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %key, "Successfully saved document to S3");
                    Ok(id)
                }
                Err(err) => {
                    error!(key = %key, error = %DisplayErrorContext(&err), "Failed to save document to S3");
                    Err(StorageError::operation_failed(format!(
                        "S3 put_object failed for key '{}': {}",
                        key,
                        DisplayErrorContext(&err)
                    )))
                }
            }
        }
    }

    #[instrument(skip(self, filter), fields(bucket = %self.bucket))]
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<StoredDocument>, StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let prefix = collection_prefix(collection);
        let filter = filter.clone();
        let open = self.ensure_open();

        async move {
            open?;

            let mut found = Vec::new();
            if limit == 0 {
                return Ok(found);
            }

            let mut continuation: Option<String> = None;
            loop {
                let page = client
                    .list_objects_v2()
                    .bucket(&bucket)
                    .prefix(&prefix)
                    .set_continuation_token(continuation.take())
                    .send()
                    .await
                    .map_err(|err| {
                        error!(prefix = %prefix, error = %DisplayErrorContext(&err), "Failed to list S3 documents");
                        StorageError::operation_failed(format!(
                            "S3 list_objects_v2 failed for prefix '{}': {}",
                            prefix,
                            DisplayErrorContext(&err)
                        ))
                    })?;

                for object in page.contents() {
                    let Some(key) = object.key() else { continue };
                    let Some(id) = parse_document_key(&prefix, key) else {
                        warn!(key = %key, "Skipping object with unexpected key");
                        continue;
                    };

                    let body = match fetch_document(&client, &bucket, key).await {
                        Ok(body) => body,
                        Err(StorageError::Malformed(reason)) => {
                            warn!(key = %key, reason = %reason, "Skipping malformed document");
                            continue;
                        }
                        Err(err) => return Err(err),
                    };
                    if filter.matches(&body) {
                        found.push(StoredDocument { id, body });
                        if found.len() == limit {
                            debug!(prefix = %prefix, count = found.len(), "Reached find limit");
                            return Ok(found);
                        }
                    }
                }

                match page.next_continuation_token() {
                    Some(token) if page.is_truncated().unwrap_or(false) => {
                        continuation = Some(token.to_string());
                    }
                    _ => break,
                }
            }

            debug!(prefix = %prefix, count = found.len(), "Finished scanning S3 documents");
            Ok(found)
        }
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    fn verify_connection(&self) -> impl std::future::Future<Output = Result<(), StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let open = self.ensure_open();

        async move {
            open?;

            match client.head_bucket().bucket(&bucket).send().await {
                Ok(_) => {
                    info!(bucket = %bucket, "S3 bucket is reachable");
                    Ok(())
                }
                Err(err) => {
                    error!(bucket = %bucket, error = %DisplayErrorContext(&err), "S3 bucket is not reachable");
                    Err(StorageError::unavailable(format!(
                        "S3 head_bucket failed for bucket '{}': {}",
                        bucket,
                        DisplayErrorContext(&err)
                    )))
                }
            }
        }
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(bucket = %self.bucket, "Closed S3DocumentStore");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_layout() {
        let id = DocumentId::new();
        assert_eq!(
            document_key("reception_requests", &id),
            format!("reception_requests/{}.json", id)
        );
    }

    #[test]
    fn test_parse_document_key_round_trip() {
        let id = DocumentId::new();
        let key = document_key("reception_requests", &id);

        assert_eq!(parse_document_key("reception_requests/", &key), Some(id));
    }

    #[test]
    fn test_parse_document_key_rejects_foreign_objects() {
        let id = DocumentId::new();

        assert_eq!(parse_document_key("a/", &format!("b/{}.json", id)), None);
        assert_eq!(parse_document_key("a/", &format!("a/{}.txt", id)), None);
        assert_eq!(parse_document_key("a/", "a/readme.json"), None);
    }

    #[test]
    fn test_prefix_does_not_overlap_sibling_collections() {
        let id = DocumentId::new();
        let key = document_key("reception_requests_archive", &id);

        assert_eq!(parse_document_key(&collection_prefix("reception_requests"), &key), None);
    }
}
