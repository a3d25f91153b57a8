//! Dashboard statistics types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of `GET /statistics/overview`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatisticsOverview {
    pub total_cases: u64,
    pub active_cases: u64,
    pub completed_cases: u64,
    pub pending_review: u64,
    /// Case counts keyed by status wire name
    pub cases_by_status: BTreeMap<String, u64>,
    pub recent_activity: Vec<ActivityItem>,
}

impl StatisticsOverview {
    /// Share of cases completed, in `0.0..=1.0`
    pub fn completion_rate(&self) -> f64 {
        if self.total_cases == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.completed_cases as f64 / self.total_cases as f64;
        rate.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    pub description: String,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let overview: StatisticsOverview =
            serde_json::from_str(r#"{"totalCases": 8, "completedCases": 2}"#).unwrap();
        assert_eq!(overview.active_cases, 0);
        assert!((overview.completion_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_overview_has_zero_rate() {
        assert!(StatisticsOverview::default().completion_rate().abs() < f64::EPSILON);
    }
}
