use std::time::Duration;

/// Connection settings for a Kommo account
#[derive(Debug, Clone)]
pub struct KommoConfig {
    /// Account base URL, e.g. `https://clinic.kommo.com`
    pub base_url: String,
    /// Long-lived integration token
    pub access_token: String,
    /// Pipeline new leads are created in; Kommo's default pipeline when unset
    pub pipeline_id: Option<u64>,
    /// Timeout applied to each HTTP call
    pub timeout: Duration,
}

impl KommoConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            pipeline_id: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
