//! Receptionist intake handlers

use axum::{extract::State, Json};
use medassist_domain::ReceptionRequest;
use tracing::info;

use crate::{
    dto::{
        error::ErrorEnvelope,
        reception::{AckResponse, ListRequestsQuery, ReceptionRecordDto, ReceptionRequestBody},
    },
    error::ApiError,
    extract::{ValidJson, ValidQuery},
    AppState,
};

pub const ACKNOWLEDGEMENT: &str = "Request received. Our agent will call you shortly.";

/// Ask for a call back from a human receptionist
///
/// The request is stored before the CRM is told about it. CRM delivery
/// happens in the background and never changes this response.
#[utoipa::path(
    post,
    path = "/reception/request",
    request_body = ReceptionRequestBody,
    responses(
        (status = 200, description = "Request stored", body = AckResponse),
        (status = 422, description = "Missing or invalid field", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "reception"
)]
pub async fn submit_request(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ReceptionRequestBody>,
) -> Result<Json<AckResponse>, ApiError> {
    let request = ReceptionRequest::try_from(body)?;
    let record = state.reception.submit(request).await?;

    info!(user_id = %record.user_id(), request_id = ?record.id(), "Stored reception request");

    Ok(Json(AckResponse {
        message: ACKNOWLEDGEMENT.to_string(),
    }))
}

/// List a user's callback requests, oldest first, at most 100
#[utoipa::path(
    get,
    path = "/reception/request",
    params(ListRequestsQuery),
    responses(
        (status = 200, description = "Requests of the user", body = [ReceptionRecordDto]),
        (status = 422, description = "Missing user_id", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "reception"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListRequestsQuery>,
) -> Result<Json<Vec<ReceptionRecordDto>>, ApiError> {
    let user_id = query.user_id.unwrap_or_default();
    let records = state.reception.list(&user_id).await?;

    Ok(Json(records.into_iter().map(ReceptionRecordDto::from).collect()))
}
