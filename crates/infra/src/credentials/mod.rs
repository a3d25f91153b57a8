//! Durable credential stores
//!
//! Both stores persist the same four keys: `access_token`, `refresh_token`,
//! `user_profile` and `remember_me`.

mod file_store;
mod keychain_store;

use serde::{Deserialize, Serialize};
use visadesk_domain::{CredentialPair, StoredSession, UserProfile};

pub use file_store::FileCredentialStore;
pub use keychain_store::KeychainCredentialStore;

/// Flat on-disk shape of a [`StoredSession`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CredentialRecord {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_profile: Option<UserProfile>,
    #[serde(default)]
    remember_me: bool,
}

impl From<&StoredSession> for CredentialRecord {
    fn from(session: &StoredSession) -> Self {
        Self {
            access_token: session.credentials.access_token.clone(),
            refresh_token: session.credentials.refresh_token.clone(),
            user_profile: session.user.clone(),
            remember_me: session.remember_me,
        }
    }
}

impl CredentialRecord {
    /// `None` when no access token was stored
    fn into_session(self) -> Option<StoredSession> {
        if self.access_token.is_empty() {
            return None;
        }
        Some(StoredSession {
            credentials: CredentialPair::new(self.access_token, self.refresh_token),
            user: self.user_profile,
            remember_me: self.remember_me,
        })
    }
}
