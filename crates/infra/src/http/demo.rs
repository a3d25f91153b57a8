//! Canned backend for `transport = "fake"`
//!
//! Lets the client run without a server. Staff sign in as `a@b.com` /
//! `secret1`; every protected route requires a bearer token issued by this
//! backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use super::fake::FakeTransport;
use super::transport::{HttpRequest, HttpResponse};

pub const DEMO_EMAIL: &str = "a@b.com";
pub const DEMO_PASSWORD: &str = "secret1";
const TOKEN_PREFIX: &str = "demo-access-";

fn unauthorized() -> HttpResponse {
    HttpResponse::json(StatusCode::UNAUTHORIZED, &json!({"message": "Unauthorized"}))
}

fn tokens(issued: &AtomicU64) -> Value {
    let n = issued.fetch_add(1, Ordering::Relaxed) + 1;
    json!({
        "accessToken": format!("{TOKEN_PREFIX}{n}"),
        "refreshToken": "demo-refresh",
        "user": {"id": "u-demo", "email": DEMO_EMAIL, "name": "Demo Consultant", "role": "consultant"}
    })
}

fn demo_case(id: &str, first: &str, last: &str, status: &str) -> Value {
    json!({
        "id": id,
        "reference": format!("VD-{id}"),
        "applicant": {"firstName": first, "lastName": last, "email": format!("{}@example.com", first.to_lowercase())},
        "visaType": "B1/B2",
        "status": status,
        "createdAt": "2026-01-05T10:00:00Z",
        "updatedAt": "2026-01-06T09:30:00Z"
    })
}

/// Register a protected JSON route answering `body`
fn protected(fake: &FakeTransport, method: Method, path: &str, body: Value) {
    fake.route(method, path, move |request: &HttpRequest| {
        if request.bearer_token().is_some_and(|t| t.starts_with(TOKEN_PREFIX)) {
            Ok(HttpResponse::json(StatusCode::OK, &body))
        } else {
            Ok(unauthorized())
        }
    });
}

/// A [`FakeTransport`] answering the main endpoints with sample data
pub fn demo_backend() -> FakeTransport {
    let fake = FakeTransport::new();
    let issued = Arc::new(AtomicU64::new(0));

    fake.json(Method::GET, "/health", 200, json!({"status": "ok"}));

    let login_issued = issued.clone();
    fake.route(Method::POST, "/auth/login", move |request| {
        let body = request.json_body().cloned().unwrap_or(Value::Null);
        if body["email"] == DEMO_EMAIL && body["password"] == DEMO_PASSWORD {
            Ok(HttpResponse::json(StatusCode::OK, &tokens(&login_issued)))
        } else {
            Ok(HttpResponse::json(
                StatusCode::UNAUTHORIZED,
                &json!({"message": "Invalid credentials"}),
            ))
        }
    });

    fake.route(Method::POST, "/auth/refresh", move |request| {
        match request.json_body().and_then(|b| b["refreshToken"].as_str()) {
            Some("demo-refresh") => Ok(HttpResponse::json(StatusCode::OK, &tokens(&issued))),
            _ => Ok(unauthorized()),
        }
    });
    fake.json(Method::POST, "/auth/forgot-password", 200, json!({"sent": true}));

    protected(
        &fake,
        Method::GET,
        "/cases",
        json!({
            "data": [
                demo_case("c-1001", "Ana", "Silva", "in_progress"),
                demo_case("c-1002", "Kenji", "Sato", "submitted")
            ],
            "total": 2,
            "page": 1,
            "limit": 20
        }),
    );
    protected(&fake, Method::GET, "/cases/:id", demo_case("c-1001", "Ana", "Silva", "in_progress"));
    protected(
        &fake,
        Method::GET,
        "/statistics/overview",
        json!({
            "totalCases": 2,
            "activeCases": 2,
            "completedCases": 0,
            "pendingReview": 1,
            "casesByStatus": {"in_progress": 1, "submitted": 1}
        }),
    );
    protected(&fake, Method::GET, "/notifications", json!([]));
    protected(&fake, Method::GET, "/notifications/unread-count", json!({"count": 0}));

    fake.json(
        Method::GET,
        "/client/validate/:token",
        200,
        json!({"valid": true, "caseId": "c-1001", "applicantName": "Ana Silva", "formData": {}}),
    );

    fake
}
