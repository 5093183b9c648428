//! Reception domain module
//!
//! A reception request is a patient asking to be called back by a human
//! receptionist. Requests are validated, stamped with the server time,
//! persisted, and then handed to a notifier that forwards them to the CRM.

mod entity;
mod error;
mod ports;
mod service;

pub use entity::{ReceptionRecord, ReceptionRequest, PHONE_MAX_LEN};
pub use error::{ReceptionError, Result};
#[cfg(test)]
pub use ports::MockIntakeNotifier;
pub use ports::IntakeNotifier;
pub use service::{ReceptionService, LIST_LIMIT, RECEPTION_COLLECTION};
