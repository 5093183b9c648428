//! # MedAssist Domain Layer
//!
//! This crate contains the pure business logic and domain models behind the
//! Healthcare AI Assistant API. It follows hexagonal architecture principles:
//!
//! - **Entities**: Core domain models (`ReceptionRequest`, `ReceptionRecord`)
//! - **Ports**: Trait definitions for external dependencies (`DocumentStore`,
//!   `CrmForwarder`, `IntakeNotifier`)
//! - **Services**: Business logic orchestration (`ReceptionService`)
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (AWS, HTTP, CRM
//! vendors, etc.). All external dependencies are expressed as traits (ports)
//! that are implemented by adapter crates.
//!
//! ## Example
//!
//! ```rust
//! use medassist_domain::reception::{ReceptionRequest, ReceptionService};
//! use medassist_domain::ports::{DocumentStore, IntakeNotifier};
//!
//! async fn example<S: DocumentStore, N: IntakeNotifier>(service: ReceptionService<S, N>) {
//!     let request = ReceptionRequest::new("user-1", "Ana", "+34 600 000 000", "Billing").unwrap();
//!     let record = service.submit(request).await.unwrap();
//!     println!("Stored reception request {:?}", record.id());
//! }
//! ```

pub mod crm;
pub mod reception;
pub mod storage;

/// All ports in one place, for adapters that implement several of them.
pub mod ports {
    pub use crate::crm::CrmForwarder;
    pub use crate::reception::IntakeNotifier;
    pub use crate::storage::DocumentStore;
}

// Re-export commonly used types
pub use reception::{ReceptionRecord, ReceptionRequest, ReceptionService};
pub use storage::{Document, DocumentId, Filter, StoredDocument};
