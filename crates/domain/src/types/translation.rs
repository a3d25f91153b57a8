//! Translation comparison types
//!
//! The backend translates applicant answers into English; consultants review
//! each field side by side.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    #[default]
    Pending,
    Translated,
    Reviewed,
    NeedsAttention,
}

impl_domain_status_conversions!(TranslationStatus {
    Pending => "pending",
    Translated => "translated",
    Reviewed => "reviewed",
    NeedsAttention => "needs_attention",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationField {
    pub field: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub translated: String,
    #[serde(default)]
    pub status: TranslationStatus,
}

/// Result of `GET /cases/:id/translation/comparison`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationComparison {
    pub case_id: String,
    #[serde(default)]
    pub fields: Vec<TranslationField>,
}

impl TranslationComparison {
    pub fn field(&self, name: &str) -> Option<&TranslationField> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Fields a consultant still has to look at
    pub fn pending_review(&self) -> impl Iterator<Item = &TranslationField> {
        self.fields.iter().filter(|f| {
            matches!(f.status, TranslationStatus::Pending | TranslationStatus::NeedsAttention)
        })
    }
}
