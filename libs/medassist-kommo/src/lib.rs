//! Kommo CRM adapter
//!
//! Implements the `CrmForwarder` port against the Kommo REST API (v4). Every
//! reception request becomes a lead with an embedded contact, tagged
//! `receptionist`, plus a common note carrying the reason for the call.

mod config;
mod forwarder;
mod payload;

pub use config::KommoConfig;
pub use forwarder::KommoForwarder;
