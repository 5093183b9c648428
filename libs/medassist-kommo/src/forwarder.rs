//! Kommo implementation of the CrmForwarder port

use std::sync::Arc;

use medassist_domain::{crm::CrmError, ports::CrmForwarder, ReceptionRecord};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::KommoConfig;
use crate::payload::{ComplexLead, CreatedLead, LeadNote};

const COMPLEX_LEADS_PATH: &str = "/api/v4/leads/complex";
const LEAD_NOTES_PATH: &str = "/api/v4/leads/notes";
const MAX_ERROR_DETAIL: usize = 512;

/// Pushes reception records to Kommo
///
/// A push is two calls: create the lead (with its contact) and attach a note
/// with the reason. Only the first call decides the outcome. Once the lead
/// exists, retrying would create a duplicate, so a failed note is logged and
/// the push still counts as delivered.
#[derive(Clone)]
pub struct KommoForwarder {
    client: reqwest::Client,
    config: Arc<KommoConfig>,
}

impl KommoForwarder {
    pub fn new(config: KommoConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        info!(base_url = %config.base_url, pipeline_id = ?config.pipeline_id, "Initializing KommoForwarder");
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, CrmError> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "Calling Kommo");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(body)
            .send()
            .await
            .map_err(|err| CrmError::transport(format!("POST {url} failed: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut detail = response.text().await.unwrap_or_default();
        if detail.len() > MAX_ERROR_DETAIL {
            let mut cut = MAX_ERROR_DETAIL;
            while !detail.is_char_boundary(cut) {
                cut -= 1;
            }
            detail.truncate(cut);
        }
        Err(CrmError::rejected(status.as_u16(), detail))
    }

    async fn create_lead(&self, record: &ReceptionRecord) -> Result<u64, CrmError> {
        let leads = [ComplexLead::from_record(record, self.config.pipeline_id)];
        let response = self.post_json(COMPLEX_LEADS_PATH, &leads).await?;

        let created: Vec<CreatedLead> = response
            .json()
            .await
            .map_err(|err| CrmError::InvalidResponse(format!("lead response: {err}")))?;

        created
            .first()
            .map(|lead| lead.id)
            .ok_or_else(|| CrmError::InvalidResponse("Kommo returned no lead".to_string()))
    }

    async fn attach_note(&self, lead_id: u64, record: &ReceptionRecord) -> Result<(), CrmError> {
        let notes = [LeadNote::for_record(lead_id, record)];
        self.post_json(LEAD_NOTES_PATH, &notes).await?;
        Ok(())
    }
}

impl CrmForwarder for KommoForwarder {
    #[instrument(skip(self, record), fields(user_id = %record.user_id()))]
    async fn push(&self, record: &ReceptionRecord) -> Result<(), CrmError> {
        let lead_id = self.create_lead(record).await?;
        info!(lead_id, "Created Kommo lead");

        if let Err(err) = self.attach_note(lead_id, record).await {
            warn!(lead_id, error = %err, "Lead created but attaching the note failed");
        }

        Ok(())
    }
}
