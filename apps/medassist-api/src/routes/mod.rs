//! API routes
//!
//! Business areas are plugged in as `Mount`s: a router plus the prefix it
//! lives under. Mounts sharing a prefix are merged before nesting, so two
//! modules may both serve under `/chat`. Colliding path and method pairs make
//! router construction panic, which stops the process before it binds.

pub mod reception;

use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::HttpConfig,
    dto::{
        error::{ErrorDetail, ErrorEnvelope},
        health::{HealthResponse, ReadinessResponse},
        reception::{AckResponse, ReceptionRecordDto, ReceptionRequestBody},
    },
    handlers::{self, fallback},
    middleware::{cors_layer, envelope_bare_errors, panic_response, session_layer},
    AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::liveness,
        handlers::health::readiness,
        handlers::reception::submit_request,
        handlers::reception::list_requests
    ),
    components(
        schemas(
            HealthResponse,
            ReadinessResponse,
            ReceptionRequestBody,
            AckResponse,
            ReceptionRecordDto,
            ErrorEnvelope,
            ErrorDetail
        )
    ),
    tags(
        (name = "reception", description = "Human receptionist callback requests"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Healthcare AI Assistant API",
        version = "0.1.0",
        description = "Backend API of the healthcare chatbot platform",
        contact(
            name = "MedAssist Team"
        )
    )
)]
pub struct ApiDoc;

/// A router module and the prefix it is served under
pub struct Mount {
    prefix: String,
    router: Router<AppState>,
}

impl Mount {
    /// `""` or `"/"` mounts at the root. Trailing slashes are ignored.
    pub fn new(prefix: impl Into<String>, router: Router<AppState>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        let prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix, router }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Router modules served by this binary
pub fn default_mounts() -> Vec<Mount> {
    vec![Mount::new(reception::PREFIX, reception::routes())]
}

/// Merge mounts that share a prefix, then nest each group under it
pub fn compose(mounts: Vec<Mount>) -> Router<AppState> {
    let mut groups: Vec<(String, Router<AppState>)> = Vec::new();
    for Mount { prefix, router } in mounts {
        match groups.iter_mut().find(|(existing, _)| *existing == prefix) {
            Some((_, group)) => *group = std::mem::take(group).merge(router),
            None => groups.push((prefix, router)),
        }
    }

    groups
        .into_iter()
        .fold(Router::new(), |app, (prefix, router)| {
            if prefix.is_empty() {
                app.merge(router)
            } else {
                app.nest(&prefix, router)
            }
        })
}

/// Create the main application router
///
/// Layers, outermost first: request tracing, CORS, sessions, panic capture,
/// bare error enveloping.
pub fn create_router(state: AppState, http: &HttpConfig, mounts: Vec<Mount>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::health::liveness))
        .route("/ready", get(handlers::health::readiness))
        .merge(compose(mounts))
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .layer(axum::middleware::map_response(envelope_bare_errors))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(session_layer(&http.session))
        .layer(cors_layer(&http.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_prefix_normalization() {
        assert_eq!(Mount::new("/reception/", Router::new()).prefix(), "/reception");
        assert_eq!(Mount::new("chat", Router::new()).prefix(), "/chat");
        assert_eq!(Mount::new("/", Router::new()).prefix(), "");
        assert_eq!(Mount::new("", Router::new()).prefix(), "");
    }

    #[test]
    #[should_panic]
    fn test_colliding_routes_are_rejected() {
        let first = Router::new().route("/history", get(|| async { "a" }));
        let second = Router::new().route("/history", get(|| async { "b" }));

        let _ = compose(vec![Mount::new("/chat", first), Mount::new("/chat", second)]);
    }

    #[test]
    fn test_openapi_lists_reception_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/reception/request"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }
}
