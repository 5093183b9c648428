//! HTTP error normalization.
//!
//! Every failed request is mapped exactly once to an `ApiError`, and every
//! `ApiError` renders as the same `ErrorEnvelope`. Client faults keep their
//! detail; unexpected faults are logged server-side and answered with a
//! generic message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medassist_domain::reception::ReceptionError;
use thiserror::Error;
use tracing::{error, warn};

use crate::dto::error::ErrorEnvelope;

pub const VALIDATION_ERROR: &str = "RequestValidationError";
pub const HTTP_EXCEPTION: &str = "HTTPException";
pub const INTERNAL_ERROR: &str = "InternalServerError";

/// Detail sent for every unexpected fault
pub const INTERNAL_DETAIL: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Request shape or content is unacceptable. Always 422.
    #[error("{0}")]
    Validation(String),

    /// A deliberate HTTP failure with its own status
    #[error("{detail}")]
    Http { status: StatusCode, detail: String },

    /// Anything else. Always 500; the message is only logged.
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn http(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::http(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Http { status, .. } => *status,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope `type` of this error
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => VALIDATION_ERROR,
            Self::Http { .. } => HTTP_EXCEPTION,
            Self::Unexpected(_) => INTERNAL_ERROR,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let detail = match self {
            Self::Validation(detail) | Self::Http { detail, .. } => detail.as_str(),
            Self::Unexpected(_) => INTERNAL_DETAIL,
        };
        ErrorEnvelope::new(self.kind(), detail, self.status().as_u16())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Unexpected(cause) => error!(error = %cause, "Unexpected failure while handling request"),
            Self::Http { detail, .. } if status.is_server_error() => {
                warn!(status = status.as_u16(), detail = %detail, "Request failed")
            }
            _ => {}
        }

        (status, Json(self.envelope())).into_response()
    }
}

impl From<ReceptionError> for ApiError {
    fn from(err: ReceptionError) -> Self {
        if err.is_client_fault() {
            Self::Validation(err.to_string())
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}

/// Undecodable JSON is a validation error; transport-level rejections (body
/// too large, wrong content type) keep axum's status.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                Self::Validation(rejection.body_text())
            }
            other => Self::http(other.status(), other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_domain::storage::StorageError;

    #[test]
    fn test_client_fault_keeps_detail() {
        let err = ApiError::from(ReceptionError::MissingField("reason"));
        let envelope = err.envelope();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!envelope.success);
        assert_eq!(envelope.error.kind, VALIDATION_ERROR);
        assert_eq!(envelope.error.detail, "Field 'reason' is required");
        assert_eq!(envelope.error.status_code, 422);
    }

    #[test]
    fn test_storage_failure_is_hidden() {
        let err = ApiError::from(ReceptionError::from(StorageError::unavailable(
            "connection refused to 10.0.0.3",
        )));
        let envelope = err.envelope();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.error.kind, INTERNAL_ERROR);
        assert_eq!(envelope.error.detail, INTERNAL_DETAIL);
    }

    #[test]
    fn test_http_exception_keeps_status() {
        let err = ApiError::http(StatusCode::SERVICE_UNAVAILABLE, "Document store unavailable");
        let envelope = err.envelope();

        assert_eq!(envelope.error.kind, HTTP_EXCEPTION);
        assert_eq!(envelope.error.status_code, 503);
        assert_eq!(envelope.error.detail, "Document store unavailable");
    }

    #[test]
    fn test_envelope_wire_shape() {
        let json = serde_json::to_value(ApiError::not_found().envelope()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": { "type": "HTTPException", "detail": "Not Found", "status_code": 404 }
            })
        );
    }
}
