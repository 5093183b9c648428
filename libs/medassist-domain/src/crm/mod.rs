//! CRM forwarding domain module
//!
//! The CRM receives a one-way copy of every reception request. Delivery is
//! best effort: failures are classified here so callers can decide whether a
//! retry makes sense, but they never flow back to the HTTP client.

mod error;
mod ports;

pub use error::CrmError;
pub use ports::CrmForwarder;
