//! Case types
//!
//! A case is one visa-application workflow instance tracked by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Lifecycle status of a case as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    LinkSent,
    InProgress,
    Submitted,
    UnderReview,
    Translated,
    Completed,
    Cancelled,
}

impl_domain_status_conversions!(CaseStatus {
    Draft => "draft",
    LinkSent => "link_sent",
    InProgress => "in_progress",
    Submitted => "submitted",
    UnderReview => "under_review",
    Translated => "translated",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl CaseStatus {
    /// Whether the applicant may still edit the form
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::LinkSent | Self::InProgress)
    }

    /// Whether the case has left the active workflow
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Applicant details embedded in a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ApplicantSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub applicant: ApplicantSummary,
    pub visa_type: String,
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /cases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase {
    pub applicant: ApplicantSummary,
    pub visa_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for `PUT /cases/:id`; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CaseUpdate {
    pub fn is_empty(&self) -> bool {
        self.applicant.is_none()
            && self.visa_type.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Filters for `GET /cases`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CaseQuery {
    pub status: Option<CaseStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CaseQuery {
    /// Query-string pairs in a stable order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}

impl_domain_status_conversions!(IssueSeverity {
    Info => "info",
    Warning => "warning",
    Error => "error",
});

/// One finding of the backend AI diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub severity: IssueSeverity,
    pub message: String,
}

/// AI diagnosis computed by the backend for a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub case_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default)]
    pub issues: Vec<DiagnosisIssue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Diagnosis {
    pub fn blocking_issues(&self) -> impl Iterator<Item = &DiagnosisIssue> {
        self.issues.iter().filter(|issue| issue.severity == IssueSeverity::Error)
    }
}
