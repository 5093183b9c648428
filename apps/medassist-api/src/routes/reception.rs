//! Receptionist routes

use axum::{routing::post, Router};

use crate::{
    handlers::reception::{list_requests, submit_request},
    AppState,
};

pub const PREFIX: &str = "/reception";

/// Create receptionist routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/request", post(submit_request).get(list_requests))
}
