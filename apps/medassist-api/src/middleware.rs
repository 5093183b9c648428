//! Cross-cutting HTTP layers: CORS, signed-cookie sessions, panic capture,
//! enveloping of bare error responses

use std::any::Any;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha512};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_sessions::{cookie::Key, service::SignedCookie, MemoryStore, SessionManagerLayer};

use crate::{config::SessionConfig, error::ApiError};

/// CORS for the configured frontends only
///
/// Allow-listed origins get credentialed responses for any method and header
/// (both mirrored from the preflight). Other origins get no CORS headers.
pub fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Server-side sessions keyed by a signed cookie
///
/// The signing key is the SHA-512 digest of `SECRET_KEY`, which yields the
/// 64 bytes the cookie `Key` requires whatever the secret length.
pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let digest = Sha512::digest(config.secret.as_bytes());
    let key = Key::from(digest.as_slice());

    SessionManagerLayer::new(MemoryStore::default())
        .with_same_site(config.same_site)
        .with_secure(config.secure)
        .with_http_only(true)
        .with_signed(key)
}

/// Turn a handler panic into the generic 500 envelope
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    };
    ApiError::Unexpected(message).into_response()
}

/// Wrap error responses that carry no JSON body in the error envelope
///
/// Handlers and extractors already answer with `ApiError`. This catches the
/// rest, such as misses inside the Swagger UI router.
pub async fn envelope_bare_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return response;
    }

    let detail = status.canonical_reason().unwrap_or("Error");
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        ApiError::Unexpected(format!("bare 500 response: {detail}")).into_response()
    } else {
        ApiError::http(status, detail).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};

    async fn envelope_of(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bare_error_gets_envelope() {
        let bare = (StatusCode::NOT_FOUND, "").into_response();

        let response = envelope_bare_errors(bare).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = envelope_of(response).await;
        assert_eq!(json["error"]["type"], "HTTPException");
        assert_eq!(json["error"]["detail"], "Not Found");
    }

    #[tokio::test]
    async fn test_bare_500_is_masked() {
        let bare = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        let json = envelope_of(envelope_bare_errors(bare).await).await;

        assert_eq!(json["error"]["type"], "InternalServerError");
        assert_eq!(json["error"]["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn test_json_errors_and_successes_pass_through() {
        let enveloped = ApiError::Validation("Field 'name' is required".into()).into_response();
        let json = envelope_of(envelope_bare_errors(enveloped).await).await;
        assert_eq!(json["error"]["detail"], "Field 'name' is required");

        let ok = Response::new(Body::from("plain"));
        let response = envelope_bare_errors(ok).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"plain");
    }
}
