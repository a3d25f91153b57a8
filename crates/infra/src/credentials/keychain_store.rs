//! Platform keychain credential store

use async_trait::async_trait;
use keyring::Entry;
use tokio::task;
use tracing::debug;
use visadesk_core::CredentialStore;
use visadesk_domain::constants::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, REMEMBER_ME_KEY, USER_PROFILE_KEY,
};
use visadesk_domain::{Result, StoredSession, VisadeskError};

use super::CredentialRecord;
use crate::errors::InfraError;

const ALL_KEYS: [&str; 4] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_PROFILE_KEY, REMEMBER_ME_KEY];

/// One keychain entry per credential key under a single service name
///
/// Keychain calls block, so each operation runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct KeychainCredentialStore {
    service: String,
}

impl KeychainCredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

fn entry(service: &str, key: &str) -> Result<Entry> {
    Entry::new(service, key).map_err(|e| InfraError::from(e).into())
}

/// Read one key, `None` when the entry does not exist
fn read(service: &str, key: &str) -> Result<Option<String>> {
    match entry(service, key)?.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(InfraError::from(err).into()),
    }
}

fn write(service: &str, key: &str, value: &str) -> Result<()> {
    entry(service, key)?.set_password(value).map_err(|e| InfraError::from(e).into())
}

fn remove(service: &str, key: &str) -> Result<()> {
    match entry(service, key)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(err) => Err(InfraError::from(err).into()),
    }
}

fn load_record(service: &str) -> Result<Option<CredentialRecord>> {
    let Some(access_token) = read(service, ACCESS_TOKEN_KEY)? else {
        return Ok(None);
    };
    let refresh_token = read(service, REFRESH_TOKEN_KEY)?;
    let user_profile = match read(service, USER_PROFILE_KEY)? {
        Some(json) => Some(serde_json::from_str(&json).map_err(InfraError::from)?),
        None => None,
    };
    let remember_me = read(service, REMEMBER_ME_KEY)?.is_some_and(|v| v == "true");

    Ok(Some(CredentialRecord { access_token, refresh_token, user_profile, remember_me }))
}

fn save_record(service: &str, record: &CredentialRecord) -> Result<()> {
    write(service, ACCESS_TOKEN_KEY, &record.access_token)?;
    match &record.refresh_token {
        Some(token) => write(service, REFRESH_TOKEN_KEY, token)?,
        None => remove(service, REFRESH_TOKEN_KEY)?,
    }
    match &record.user_profile {
        Some(user) => {
            let json = serde_json::to_string(user).map_err(InfraError::from)?;
            write(service, USER_PROFILE_KEY, &json)?;
        }
        None => remove(service, USER_PROFILE_KEY)?,
    }
    write(service, REMEMBER_ME_KEY, if record.remember_me { "true" } else { "false" })
}

fn map_join_error(err: task::JoinError) -> VisadeskError {
    VisadeskError::Internal(format!("keychain task failed: {err}"))
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn load(&self) -> Result<Option<StoredSession>> {
        let service = self.service.clone();
        let record = task::spawn_blocking(move || load_record(&service))
            .await
            .map_err(map_join_error)??;
        Ok(record.and_then(CredentialRecord::into_session))
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        let service = self.service.clone();
        let record = CredentialRecord::from(session);
        task::spawn_blocking(move || save_record(&service, &record))
            .await
            .map_err(map_join_error)??;
        debug!(service = %self.service, "session saved to keychain");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let service = self.service.clone();
        task::spawn_blocking(move || -> Result<()> {
            for key in ALL_KEYS {
                remove(&service, key)?;
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
