//! DS-160 form types
//!
//! The DS-160 is split into sections the applicant saves one at a time.
//! Field values are kept as raw JSON objects; the backend owns the schema.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Field values of one section, keyed by field name
pub type SectionData = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ds160Section {
    Personal,
    Travel,
    Passport,
    Contact,
    Family,
    WorkEducation,
    Security,
}

impl_domain_status_conversions!(Ds160Section {
    Personal => "personal",
    Travel => "travel",
    Passport => "passport",
    Contact => "contact",
    Family => "family",
    WorkEducation => "work_education",
    Security => "security",
});

impl Ds160Section {
    /// All sections in form order
    pub const ALL: [Self; 7] = [
        Self::Personal,
        Self::Travel,
        Self::Passport,
        Self::Contact,
        Self::Family,
        Self::WorkEducation,
        Self::Security,
    ];

    /// Sections that must be complete before submission
    pub const REQUIRED: [Self; 4] = [Self::Personal, Self::Travel, Self::Passport, Self::Contact];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ds160Status {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl_domain_status_conversions!(Ds160Status {
    Draft => "draft",
    Submitted => "submitted",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ds160Form {
    pub case_id: String,
    #[serde(default)]
    pub sections: BTreeMap<Ds160Section, SectionData>,
    #[serde(default)]
    pub status: Ds160Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ds160Form {
    pub fn section(&self, section: Ds160Section) -> Option<&SectionData> {
        self.sections.get(&section)
    }

    /// Required sections with no saved data
    pub fn missing_required(&self) -> Vec<Ds160Section> {
        Ds160Section::REQUIRED
            .into_iter()
            .filter(|s| self.sections.get(s).map_or(true, serde_json::Map::is_empty))
            .collect()
    }
}

/// Body for saving one section (`PUT /client/form/:token`, `PUT /cases/:id/ds160`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    pub section: Ds160Section,
    pub data: SectionData,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sections_serialize_as_snake_case_keys() {
        let mut sections = BTreeMap::new();
        sections.insert(Ds160Section::WorkEducation, SectionData::new());
        let form = Ds160Form {
            case_id: "c-1".into(),
            sections,
            status: Ds160Status::Draft,
            updated_at: None,
        };
        let value = serde_json::to_value(&form).unwrap();
        assert!(value["sections"].get("work_education").is_some());
        assert_eq!(value["caseId"], "c-1");
    }

    #[test]
    fn missing_required_ignores_empty_sections() {
        let form: Ds160Form = serde_json::from_value(json!({
            "caseId": "c-1",
            "sections": {
                "personal": {"surname": "Silva"},
                "travel": {}
            }
        }))
        .unwrap();
        assert_eq!(
            form.missing_required(),
            vec![Ds160Section::Travel, Ds160Section::Passport, Ds160Section::Contact]
        );
    }
}
