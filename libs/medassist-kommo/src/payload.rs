//! Kommo v4 request and response bodies

use medassist_domain::ReceptionRecord;
use serde::{Deserialize, Serialize};

pub(crate) const LEAD_TAG: &str = "receptionist";

#[derive(Debug, Serialize)]
pub(crate) struct ComplexLead<'a> {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<u64>,
    #[serde(rename = "_embedded")]
    pub embedded: LeadEmbedded<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LeadEmbedded<'a> {
    pub tags: Vec<Tag<'a>>,
    pub contacts: Vec<Contact<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Tag<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Contact<'a> {
    pub first_name: &'a str,
    pub custom_fields_values: Vec<CustomField<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomField<'a> {
    pub field_code: &'a str,
    pub values: Vec<CustomFieldValue<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomFieldValue<'a> {
    pub value: &'a str,
    pub enum_code: &'a str,
}

/// One entry of the `/api/v4/leads/complex` answer
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedLead {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LeadNote {
    pub entity_id: u64,
    pub note_type: &'static str,
    pub params: NoteParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoteParams {
    pub text: String,
}

impl<'a> ComplexLead<'a> {
    pub fn from_record(record: &'a ReceptionRecord, pipeline_id: Option<u64>) -> Self {
        Self {
            name: format!("Receptionist request: {}", record.name()),
            pipeline_id,
            embedded: LeadEmbedded {
                tags: vec![Tag { name: LEAD_TAG }],
                contacts: vec![Contact {
                    first_name: record.name(),
                    custom_fields_values: vec![CustomField {
                        field_code: "PHONE",
                        values: vec![CustomFieldValue {
                            value: record.phone(),
                            enum_code: "WORK",
                        }],
                    }],
                }],
            },
        }
    }
}

impl LeadNote {
    pub fn for_record(lead_id: u64, record: &ReceptionRecord) -> Self {
        let mut text = format!(
            "Reason: {}\nPhone: {}\nUser ID: {}\nRequested at: {}",
            record.reason(),
            record.phone(),
            record.user_id(),
            record.created_at().to_rfc3339(),
        );
        if let Some(id) = record.id() {
            text.push_str(&format!("\nRequest ID: {id}"));
        }

        Self {
            entity_id: lead_id,
            note_type: "common",
            params: NoteParams { text },
        }
    }
}
