//! In-process credential store

use async_trait::async_trait;
use parking_lot::Mutex;
use visadesk_domain::{Result, StoredSession};

use super::ports::CredentialStore;

/// Credential store that lives only as long as the process
///
/// Used when no durable backend is configured and throughout tests.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: Mutex<Option<StoredSession>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `session`
    pub fn with_session(session: StoredSession) -> Self {
        Self { inner: Mutex::new(Some(session)) }
    }

    /// Snapshot of the stored session
    pub fn snapshot(&self) -> Option<StoredSession> {
        self.inner.lock().clone()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        *self.inner.lock() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.inner.lock().take();
        Ok(())
    }
}
