use std::future::Future;

use super::CrmError;
use crate::reception::ReceptionRecord;

/// Port for pushing a reception request into an external CRM
///
/// The push is one-way: the domain does not consume anything the CRM returns.
/// Callers treat failures as notifications to log, never as request failures.
pub trait CrmForwarder: Send + Sync {
    /// Push one persisted reception record to the CRM
    ///
    /// # Errors
    ///
    /// Returns a `CrmError`; use `CrmError::is_retryable` to decide on retries
    fn push(&self, record: &ReceptionRecord) -> impl Future<Output = Result<(), CrmError>> + Send;
}
