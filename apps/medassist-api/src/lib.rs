//! Healthcare AI Assistant HTTP API
//!
//! Composes the domain services and adapters into an axum application:
//! configuration, middleware (CORS, signed-cookie sessions, panic capture,
//! request tracing), the uniform error envelope, router modules mounted under
//! their prefixes, and the startup/shutdown lifecycle.

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod notifier;
pub mod routes;
pub mod startup;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::ApiError;
pub use startup::Application;
pub use state::AppState;
