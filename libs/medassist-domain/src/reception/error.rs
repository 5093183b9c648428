//! Domain errors for reception operations

use thiserror::Error;

use crate::storage::{DocumentId, StorageError};

/// Errors that can occur while capturing or listing reception requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceptionError {
    /// A required field is absent or blank
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    /// A field is present but breaks a format rule
    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The document store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored document no longer decodes as a reception request
    #[error("Stored reception request {id} is corrupt: {reason}")]
    CorruptRecord { id: DocumentId, reason: String },
}

impl ReceptionError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// True when the caller sent bad input, false when the server failed
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::InvalidField { .. })
    }
}

/// Result type alias for reception operations
pub type Result<T> = std::result::Result<T, ReceptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_error() {
        let err = ReceptionError::MissingField("phone");
        assert!(err.is_client_fault());
        assert_eq!(err.to_string(), "Field 'phone' is required");
    }

    #[test]
    fn test_storage_error_is_not_client_fault() {
        let err = ReceptionError::from(StorageError::Closed);
        assert!(!err.is_client_fault());
        assert_eq!(err.to_string(), "Document store is closed");
    }
}
