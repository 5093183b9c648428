//! DTOs for receptionist endpoints

use chrono::{DateTime, Utc};
use medassist_domain::{reception::ReceptionError, ReceptionRecord, ReceptionRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request body for a callback request
///
/// Fields are optional at the JSON level so that a missing field surfaces as
/// a domain validation error naming it. Unknown fields, `created_at`
/// included, are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReceptionRequestBody {
    #[schema(example = "user-42")]
    pub user_id: Option<String>,
    #[schema(example = "Ana García")]
    pub name: Option<String>,
    #[schema(example = "+34 600 123 456")]
    pub phone: Option<String>,
    #[schema(example = "Question about my last invoice")]
    pub reason: Option<String>,
}

impl TryFrom<ReceptionRequestBody> for ReceptionRequest {
    type Error = ReceptionError;

    fn try_from(body: ReceptionRequestBody) -> Result<Self, Self::Error> {
        ReceptionRequest::new(
            body.user_id.ok_or(ReceptionError::MissingField("user_id"))?,
            body.name.ok_or(ReceptionError::MissingField("name"))?,
            body.phone.ok_or(ReceptionError::MissingField("phone"))?,
            body.reason.ok_or(ReceptionError::MissingField("reason"))?,
        )
    }
}

/// Fixed acknowledgement returned on intake
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AckResponse {
    #[schema(example = "Request received. Our agent will call you shortly.")]
    pub message: String,
}

/// A stored callback request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceptionRecordDto {
    #[schema(example = "01928c6e-7a3b-7cc0-9d7e-3c1f2a4b5d6e")]
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReceptionRecord> for ReceptionRecordDto {
    fn from(record: ReceptionRecord) -> Self {
        Self {
            id: record.id().map(|id| id.to_string()),
            user_id: record.user_id().to_string(),
            name: record.name().to_string(),
            phone: record.phone().to_string(),
            reason: record.reason().to_string(),
            created_at: *record.created_at(),
        }
    }
}

/// Query string of the listing endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRequestsQuery {
    /// Owner of the requests; exact match
    pub user_id: Option<String>,
}
