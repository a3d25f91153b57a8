//! Client link types
//!
//! A client link is a tokenized URL that lets an applicant fill their own
//! form without a staff account.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ds160::{Ds160Section, SectionData};

/// Result of `POST /cases/:id/generate-link`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLink {
    pub token: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of `GET /client/validate/:token`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Sections already saved server-side
    #[serde(default)]
    pub form_data: BTreeMap<Ds160Section, SectionData>,
}

impl LinkValidation {
    /// Valid and not past its expiry at `now`
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.valid && self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Result of `POST /client/upload/:token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}
