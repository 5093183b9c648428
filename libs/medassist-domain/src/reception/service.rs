//! Reception service - Business logic orchestration
//!
//! Coordinates the intake flow between the document store port and the
//! intake notifier port.

use chrono::Utc;

use super::{IntakeNotifier, ReceptionError, ReceptionRecord, ReceptionRequest};
use crate::storage::{DocumentStore, Filter};

/// Collection holding reception requests
pub const RECEPTION_COLLECTION: &str = "reception_requests";

/// Maximum number of records returned by `ReceptionService::list`
pub const LIST_LIMIT: usize = 100;

/// Service capturing human-receptionist escalations
///
/// Business rules:
/// - `created_at` is always the server clock at write time
/// - the record is persisted before anyone is notified, so a failing
///   notification can never lose it
/// - listing is an exact `user_id` match, insertion order, capped at
///   `LIST_LIMIT`
///
/// ## Static Dispatch
///
/// The service is generic over its ports; each deployment is monomorphized.
pub struct ReceptionService<S, N> {
    store: S,
    notifier: N,
}

impl<S, N> ReceptionService<S, N>
where
    S: DocumentStore,
    N: IntakeNotifier,
{
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Persist a reception request and notify the CRM side
    ///
    /// # Returns
    ///
    /// The persisted record, with its store id and server timestamp
    ///
    /// # Errors
    ///
    /// - `ReceptionError::Storage` if the write fails (nothing is notified)
    pub async fn submit(&self, request: ReceptionRequest) -> Result<ReceptionRecord, ReceptionError> {
        let record = ReceptionRecord::stamp(request, Utc::now());

        let id = self
            .store
            .insert(RECEPTION_COLLECTION, record.to_document()?)
            .await?;
        let record = record.with_id(id);

        self.notifier.notify(&record);

        Ok(record)
    }

    /// List the reception requests of one user, oldest first
    ///
    /// # Errors
    ///
    /// - `ReceptionError::MissingField` if `user_id` is blank
    /// - `ReceptionError::Storage` if the read fails
    /// - `ReceptionError::CorruptRecord` if a stored document no longer decodes
    pub async fn list(&self, user_id: &str) -> Result<Vec<ReceptionRecord>, ReceptionError> {
        if user_id.trim().is_empty() {
            return Err(ReceptionError::MissingField("user_id"));
        }

        let filter = Filter::new().equals("user_id", user_id);
        let documents = self
            .store
            .find(RECEPTION_COLLECTION, &filter, LIST_LIMIT)
            .await?;

        documents.into_iter().map(ReceptionRecord::from_stored).collect()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
