use thiserror::Error;

/// Errors returned by a CRM forwarder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrmError {
    /// The request never got an HTTP answer (DNS, connect, timeout, TLS)
    #[error("CRM transport error: {0}")]
    Transport(String),

    /// The CRM answered with a non-success status
    #[error("CRM rejected request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// The CRM answered 2xx but the body was not what we expected
    #[error("Unexpected CRM response: {0}")]
    InvalidResponse(String),
}

impl CrmError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            detail: detail.into(),
        }
    }

    /// Whether a later attempt could succeed
    ///
    /// Transport failures, throttling (429) and server-side errors (5xx) are
    /// transient. Anything else (bad token, validation errors, malformed
    /// answers) will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}
