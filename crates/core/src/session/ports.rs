//! Port interfaces for the session
//!
//! These traits define the boundaries between the session state machine and
//! the infrastructure that persists credentials and talks to the backend.

use async_trait::async_trait;
use visadesk_domain::{AuthTokens, Result, StoredSession};

/// Durable storage for the signed-in session
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored session, `None` when nothing is stored
    async fn load(&self) -> Result<Option<StoredSession>>;

    /// Replace the stored session
    async fn save(&self, session: &StoredSession) -> Result<()>;

    /// Remove every stored credential key
    async fn clear(&self) -> Result<()>;
}

/// Exchanges a refresh token for a new credential pair
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// # Errors
    /// Any error means the refresh token is no longer usable
    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens>;
}
