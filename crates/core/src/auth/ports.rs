//! Port interfaces for authentication

use async_trait::async_trait;
use visadesk_domain::{AuthTokens, LoginRequest, Result};

/// Backend authentication endpoints
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchange credentials for a token pair
    async fn login(&self, request: &LoginRequest) -> Result<AuthTokens>;

    /// Ask the backend to email a password-reset link
    async fn request_password_reset(&self, email: &str) -> Result<()>;
}
