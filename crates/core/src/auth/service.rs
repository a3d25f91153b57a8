//! Authentication service - login, logout and password reset

use std::sync::Arc;

use tracing::{info, instrument};
use visadesk_common::privacy::mask_email;
use visadesk_domain::{Result, StoredSession, UserProfile, VisadeskError};

use super::ports::AuthPort;
use super::validation::{validate_email, validate_login, LoginForm};
use crate::session::Session;

/// Authentication service
pub struct AuthService {
    port: Arc<dyn AuthPort>,
    session: Arc<Session>,
}

impl AuthService {
    pub fn new(port: Arc<dyn AuthPort>, session: Arc<Session>) -> Self {
        Self { port, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Validate the form, exchange it for tokens and start the session
    ///
    /// # Errors
    /// - `Validation` before any request when the form is invalid
    /// - `Api` when the backend rejects the credentials
    /// - `Decode` when the response carries no access token
    #[instrument(skip_all, fields(email = %mask_email(&form.email)))]
    pub async fn login(&self, form: &LoginForm) -> Result<Option<UserProfile>> {
        let request = validate_login(form)?;
        let tokens = self.port.login(&request).await?;
        if tokens.access_token.is_empty() {
            return Err(VisadeskError::Decode("login response carried no access token".into()));
        }

        let user = tokens.user.clone();
        self.session
            .sign_in(StoredSession {
                credentials: tokens.credentials(),
                user: user.clone(),
                remember_me: form.remember_me,
            })
            .await?;
        info!("Signed in");
        Ok(user)
    }

    /// End the session locally
    ///
    /// # Errors
    /// Returns `Storage` when the credential store cannot be cleared
    pub async fn logout(&self) -> Result<()> {
        self.session.sign_out().await
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.session.current_user()
    }

    /// # Errors
    /// `Validation` for a malformed address, otherwise whatever the backend
    /// answers
    #[instrument(skip_all, fields(email = %mask_email(email)))]
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let email = validate_email(email)?;
        self.port.request_password_reset(&email).await
    }
}
