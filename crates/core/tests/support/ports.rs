//! Mock port implementations for testing

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use visadesk_core::{AuthPort, TokenRefresher};
use visadesk_domain::{AuthTokens, LoginRequest, Result, UserProfile, UserRole, VisadeskError};

/// Backend that accepts a single account and rotates refresh tokens
#[derive(Default)]
pub struct MockBackend {
    pub logins: AtomicUsize,
    pub refreshes: AtomicUsize,
    pub revoked: std::sync::atomic::AtomicBool,
}

impl MockBackend {
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn revoke(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthPort for MockBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthTokens> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        if request.email != "a@b.com" || request.password != "secret1" {
            return Err(VisadeskError::api(401, "Invalid credentials"));
        }
        Ok(AuthTokens {
            access_token: "access-0".into(),
            refresh_token: Some("refresh-0".into()),
            user: Some(UserProfile {
                id: "u1".into(),
                email: request.email.clone(),
                name: None,
                role: UserRole::Admin,
            }),
        })
    }

    async fn request_password_reset(&self, _email: &str) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TokenRefresher for MockBackend {
    async fn refresh(&self, _refresh_token: &str) -> Result<AuthTokens> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::task::yield_now().await;
        if self.revoked.load(Ordering::SeqCst) {
            return Err(VisadeskError::api(401, "Refresh token revoked"));
        }
        Ok(AuthTokens {
            access_token: format!("access-{n}"),
            refresh_token: Some(format!("refresh-{n}")),
            user: None,
        })
    }
}
