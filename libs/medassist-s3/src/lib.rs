//! S3 adapter for the MedAssist document store port
//!
//! Documents are JSON objects stored under `<collection>/<document-id>.json`
//! in a single bucket.

pub mod infrastructure;

pub use infrastructure::S3DocumentStore;
