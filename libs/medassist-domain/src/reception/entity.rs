//! Domain entities for reception requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ReceptionError;
use crate::storage::{Document, DocumentId, StorageError, StoredDocument};

/// Longest accepted phone number, separators included
pub const PHONE_MAX_LEN: usize = 32;

/// A validated request to talk to a human receptionist
///
/// Construction enforces the intake rules, so holding a `ReceptionRequest`
/// means every field is present and well formed:
/// - `user_id`, `name`, `phone` and `reason` are not blank
/// - `phone` has at least one digit, only digits, spaces and `+ - ( ) .`,
///   and at most `PHONE_MAX_LEN` characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionRequest {
    user_id: String,
    name: String,
    phone: String,
    reason: String,
}

impl ReceptionRequest {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<Self, ReceptionError> {
        let request = Self {
            user_id: required("user_id", user_id.into())?,
            name: required("name", name.into())?,
            phone: required("phone", phone.into())?,
            reason: required("reason", reason.into())?,
        };
        validate_phone(&request.phone)?;
        Ok(request)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

fn required(field: &'static str, value: String) -> Result<String, ReceptionError> {
    if value.trim().is_empty() {
        Err(ReceptionError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn validate_phone(phone: &str) -> Result<(), ReceptionError> {
    if phone.chars().count() > PHONE_MAX_LEN {
        return Err(ReceptionError::invalid_field(
            "phone",
            format!("must be at most {PHONE_MAX_LEN} characters"),
        ));
    }

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');
    if !phone.chars().all(allowed) {
        return Err(ReceptionError::invalid_field(
            "phone",
            "may only contain digits, spaces and + - ( ) .",
        ));
    }

    if !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ReceptionError::invalid_field(
            "phone",
            "must contain at least one digit",
        ));
    }

    Ok(())
}

/// A reception request as persisted in the document store
///
/// Records are immutable: they are stamped once with the server time and
/// never updated. `id` is assigned by the store and is absent until the
/// record has been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptionRecord {
    #[serde(skip)]
    id: Option<DocumentId>,
    user_id: String,
    name: String,
    phone: String,
    reason: String,
    created_at: DateTime<Utc>,
}

impl ReceptionRecord {
    /// Stamp a validated request with its server-side creation time
    pub fn stamp(request: ReceptionRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_id: request.user_id,
            name: request.name,
            phone: request.phone,
            reason: request.reason,
            created_at,
        }
    }

    /// Decode a record read back from the document store
    pub fn from_stored(stored: StoredDocument) -> Result<Self, ReceptionError> {
        let id = stored.id;
        let record: Self = serde_json::from_value(Value::Object(stored.body)).map_err(|err| {
            ReceptionError::CorruptRecord {
                id,
                reason: err.to_string(),
            }
        })?;
        Ok(record.with_id(id))
    }

    /// Encode the record for the document store
    pub fn to_document(&self) -> Result<Document, ReceptionError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(other) => Err(StorageError::malformed(format!(
                "reception record encoded as {other}, expected an object"
            ))
            .into()),
            Err(err) => Err(StorageError::malformed(err.to_string()).into()),
        }
    }

    pub(crate) fn with_id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<DocumentId> {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}
