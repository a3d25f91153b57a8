use std::sync::Arc;

use serde_json::{json, Value};
use visadesk_core::InMemoryCredentialStore;
use visadesk_domain::{
    ApiConfig, Config, CredentialBackend, CredentialPair, StorageConfig, StoredSession,
};
use visadesk_infra::{AppContext, ReqwestTransport};

/// Context talking to `base_url` over reqwest, with credentials in `store`
pub async fn context(base_url: &str, store: Arc<InMemoryCredentialStore>) -> AppContext {
    let config = Config {
        api: ApiConfig { base_url: base_url.to_string(), timeout_secs: 5, ..Default::default() },
        storage: StorageConfig { backend: CredentialBackend::Memory, ..Default::default() },
        ..Default::default()
    };
    let transport = Arc::new(ReqwestTransport::new().expect("transport should build"));
    AppContext::with_parts(config, transport, store).await.expect("context should build")
}

/// A remembered session holding `access` and refresh token `r1`
pub fn stored_session(access: &str) -> StoredSession {
    StoredSession {
        credentials: CredentialPair::new(access, Some("r1".into())),
        user: None,
        remember_me: true,
    }
}

pub fn tokens_body(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "user": {"id": "u1", "email": "a@b.com", "role": "consultant"}
    })
}

pub fn cases_body() -> Value {
    cases_body_with("c1")
}

/// One-page case listing holding a single draft case `id`
pub fn cases_body_with(id: &str) -> Value {
    json!({
        "data": [{
            "id": id,
            "applicant": {"firstName": "Ana", "lastName": "Silva", "email": "ana@example.com"},
            "visaType": "B1/B2",
            "status": "draft",
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-05T10:00:00Z"
        }],
        "total": 1,
        "page": 1,
        "limit": 20
    })
}
