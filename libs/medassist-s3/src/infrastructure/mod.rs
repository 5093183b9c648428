mod s3_document_store;

pub use s3_document_store::{document_key, S3DocumentStore};
