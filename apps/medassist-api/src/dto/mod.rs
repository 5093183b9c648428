//! Request and response bodies

pub mod error;
pub mod health;
pub mod reception;
