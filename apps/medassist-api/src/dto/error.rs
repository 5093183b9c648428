//! The error envelope every non-2xx response carries

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform failure body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false`
    #[schema(example = false)]
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Failure class: `RequestValidationError`, `HTTPException` or `InternalServerError`
    #[serde(rename = "type")]
    #[schema(example = "RequestValidationError")]
    pub kind: String,
    #[schema(example = "Field 'phone' is required")]
    pub detail: String,
    #[schema(example = 422)]
    pub status_code: u16,
}

impl ErrorEnvelope {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                kind: kind.into(),
                detail: detail.into(),
                status_code,
            },
        }
    }
}
