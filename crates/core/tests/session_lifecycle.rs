//! End-to-end session lifecycle through the auth service

mod support;

use std::sync::Arc;

use support::ports::MockBackend;
use visadesk_core::{AuthService, InMemoryCredentialStore, LoginForm, Session};
use visadesk_domain::{SessionState, VisadeskError};

fn wire() -> (AuthService, Arc<MockBackend>, Arc<InMemoryCredentialStore>) {
    let backend = Arc::new(MockBackend::default());
    let store = Arc::new(InMemoryCredentialStore::new());
    let session = Arc::new(Session::new(store.clone(), backend.clone()));
    (AuthService::new(backend.clone(), session), backend, store)
}

/// Validates the login → refresh → expiry scenario
#[tokio::test]
async fn login_refresh_then_expire() {
    let (auth, backend, store) = wire();
    let session = auth.session().clone();

    auth.login(&LoginForm::new("a@b.com", "secret1").remember_me(true)).await.unwrap();
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.access_token().await.as_deref(), Some("access-0"));

    let renewed = session.refresh_after_rejection("access-0").await.unwrap();
    assert_eq!(renewed, "access-1");
    assert_eq!(store.snapshot().unwrap().credentials.access_token, "access-1");

    backend.revoke();
    let err = session.refresh_after_rejection("access-1").await.unwrap_err();
    assert_eq!(err, VisadeskError::AuthExpired);
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(store.snapshot().is_none());

    // No credentials left: no further exchange is attempted
    assert!(session.refresh_after_rejection("access-1").await.is_err());
    assert_eq!(backend.refreshes(), 2);
}

/// Validates that a restored session survives a restart only with remember-me
#[tokio::test]
async fn remember_me_controls_restore() {
    let (auth, backend, store) = wire();
    auth.login(&LoginForm::new("a@b.com", "secret1").remember_me(true)).await.unwrap();

    let restarted = Session::new(store.clone(), backend.clone());
    assert_eq!(restarted.initialize().await.unwrap(), SessionState::Authenticated);
    assert_eq!(restarted.current_user().unwrap().email, "a@b.com");

    let (auth, backend, store) = wire();
    auth.login(&LoginForm::new("a@b.com", "secret1")).await.unwrap();
    let restarted = Session::new(store.clone(), backend);
    assert_eq!(restarted.initialize().await.unwrap(), SessionState::Anonymous);
    assert!(store.snapshot().is_none());
}

/// Validates concurrent rejection scenario with a multi-threaded runtime
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_rejections_refresh_once() {
    let (auth, backend, _) = wire();
    let session = auth.session().clone();
    auth.login(&LoginForm::new("a@b.com", "secret1")).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.refresh_after_rejection("access-0").await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "access-1");
    }
    assert_eq!(backend.refreshes(), 1);
}
