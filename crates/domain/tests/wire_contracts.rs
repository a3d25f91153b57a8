//! Integration tests for backend wire contracts
//!
//! Realistic payloads as the backend sends them, checked against the domain
//! types that services deserialize into.

use serde_json::json;
use visadesk_domain::{
    AuthTokens, Case, CaseStatus, Ds160Form, Ds160Section, Notification, Page, StatisticsOverview,
    UserRole, VisadeskError,
};

// ============================================================================
// Case listing
// ============================================================================

/// Scenario: dashboard lists cases through the paged envelope
#[test]
fn test_case_page_envelope() {
    let page: Page<Case> = serde_json::from_value(json!({
        "data": [
            {
                "id": "c-1",
                "reference": "VD-2026-0001",
                "applicant": {"firstName": "Ana", "lastName": "Silva", "email": "ana@example.com"},
                "visaType": "B1/B2",
                "status": "in_progress",
                "consultantId": "u-7",
                "createdAt": "2026-03-01T10:00:00Z",
                "updatedAt": "2026-03-02T10:00:00Z"
            },
            {
                "id": "c-2",
                "applicant": {"firstName": "Li", "lastName": "Wei", "email": "li@example.com", "phone": "+86 10 5555"},
                "visaType": "F1",
                "status": "submitted",
                "createdAt": "2026-03-03T10:00:00Z",
                "updatedAt": "2026-03-04T10:00:00Z",
                "submittedAt": "2026-03-04T09:30:00Z"
            }
        ],
        "total": 41,
        "page": 1,
        "limit": 20
    }))
    .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 41);
    assert!(page.has_more());
    assert_eq!(page.items[0].status, CaseStatus::InProgress);
    assert_eq!(page.items[1].applicant.phone.as_deref(), Some("+86 10 5555"));
    assert!(page.items[1].submitted_at.is_some());
}

// ============================================================================
// Login
// ============================================================================

/// Scenario: login response carries tokens and the staff profile
#[test]
fn test_login_response_with_profile() {
    let tokens: AuthTokens = serde_json::from_value(json!({
        "access_token": "eyJhbGciOi.access",
        "refresh_token": "eyJhbGciOi.refresh",
        "user": {"id": "u-1", "email": "a@b.com", "name": "Alex", "role": "admin"}
    }))
    .unwrap();

    let user = tokens.user.clone().unwrap();
    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(tokens.credentials().refresh_token.as_deref(), Some("eyJhbGciOi.refresh"));
}

// ============================================================================
// DS-160 and dashboard
// ============================================================================

#[test]
fn test_ds160_form_round_trip_keeps_sections() {
    let form: Ds160Form = serde_json::from_value(json!({
        "caseId": "c-1",
        "status": "draft",
        "sections": {
            "personal": {"surname": "Silva", "givenNames": "Ana"},
            "passport": {"passportNumber": "FZ123456"}
        }
    }))
    .unwrap();

    assert_eq!(form.section(Ds160Section::Personal).unwrap()["givenNames"], "Ana");
    assert_eq!(form.missing_required(), vec![Ds160Section::Travel, Ds160Section::Contact]);
}

#[test]
fn test_notifications_accept_type_alias() {
    let list: Page<Notification> = serde_json::from_value(json!([
        {"id": "n-1", "type": "case_submitted", "title": "Case submitted", "createdAt": "2026-03-04T09:30:00Z"}
    ]))
    .unwrap();

    assert_eq!(list.items[0].kind, "case_submitted");
    assert!(!list.items[0].read);
}

#[test]
fn test_statistics_by_status() {
    let overview: StatisticsOverview = serde_json::from_value(json!({
        "totalCases": 10,
        "activeCases": 6,
        "completedCases": 4,
        "pendingReview": 2,
        "casesByStatus": {"in_progress": 6, "completed": 4}
    }))
    .unwrap();

    assert_eq!(overview.cases_by_status["in_progress"], 6);
}

#[test]
fn test_error_round_trips_through_json() {
    let err = VisadeskError::Api { status: 422, code: Some("INVALID".into()), message: "Bad".into() };
    let json = serde_json::to_string(&err).unwrap();
    let back: VisadeskError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}
