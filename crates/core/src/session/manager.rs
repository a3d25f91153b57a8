//! Session state machine with coalesced token refresh
//!
//! `Anonymous → Authenticated` on sign-in, `→ Refreshing` while a rejected
//! access token is exchanged, then back to `Authenticated` on success or to
//! `Anonymous` on failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use visadesk_common::privacy::redact_token;
use visadesk_domain::{
    AuthTokens, CredentialPair, Result, SessionState, StoredSession, UserProfile, VisadeskError,
};

use super::ports::{CredentialStore, TokenRefresher};

struct Inner {
    state: SessionState,
    current: Option<StoredSession>,
    /// Bumped on every sign-in, sign-out and expiry so a refresh that
    /// finishes late cannot resurrect a session that was replaced meanwhile.
    generation: u64,
}

/// Owner of the credential pair
///
/// The in-memory state is guarded by a synchronous lock that is never held
/// across an await point. Refresh exchanges are serialized by an async mutex:
/// the first caller to report a rejected token performs the exchange, every
/// caller queued behind it observes the new token and reuses it.
pub struct Session {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    inner: RwLock<Inner>,
    refresh_lock: Mutex<()>,
    exchanges: AtomicU64,
}

impl Session {
    /// Create an anonymous session
    ///
    /// Call [`initialize`](Self::initialize) to restore a stored session.
    pub fn new(store: Arc<dyn CredentialStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            store,
            refresher,
            inner: RwLock::new(Inner {
                state: SessionState::Anonymous,
                current: None,
                generation: 0,
            }),
            refresh_lock: Mutex::new(()),
            exchanges: AtomicU64::new(0),
        }
    }

    /// Restore the session from the credential store
    ///
    /// A stored session saved without "remember me" is discarded and the
    /// store cleared.
    ///
    /// # Errors
    /// Returns `Storage` if the store cannot be read
    pub async fn initialize(&self) -> Result<SessionState> {
        match self.store.load().await? {
            Some(stored) if stored.remember_me && !stored.credentials.access_token.is_empty() => {
                let mut inner = self.inner.write();
                inner.generation += 1;
                inner.current = Some(stored);
                inner.state = SessionState::Authenticated;
                info!("Session restored from credential store");
                Ok(inner.state)
            }
            Some(_) => {
                debug!("Discarding stored session without remember-me");
                self.store.clear().await?;
                Ok(SessionState::Anonymous)
            }
            None => {
                debug!("No stored session found");
                Ok(SessionState::Anonymous)
            }
        }
    }

    /// Persist a freshly issued session and mark it authenticated
    ///
    /// # Errors
    /// Returns `Storage` if the store rejects the write; the session stays
    /// anonymous in that case.
    pub async fn sign_in(&self, session: StoredSession) -> Result<()> {
        if session.credentials.access_token.is_empty() {
            return Err(VisadeskError::Decode("login response carried an empty access token".into()));
        }
        self.store.save(&session).await?;

        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.current = Some(session);
        inner.state = SessionState::Authenticated;
        info!("Session authenticated");
        Ok(())
    }

    /// Forget the credentials in memory and in the store
    ///
    /// # Errors
    /// Returns `Storage` if the store cannot be cleared; the in-memory
    /// session is already anonymous by then.
    pub async fn sign_out(&self) -> Result<()> {
        self.reset();
        info!("Session signed out");
        self.store.clear().await
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.inner.read().state
    }

    /// Whether credentials are held (also true while refreshing)
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().current.is_some()
    }

    /// Identifies the credentials currently held
    ///
    /// Changes on every sign-in, sign-out and expiry; a token refresh keeps
    /// it. Data fetched under one generation must not be served under
    /// another.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Profile of the signed-in user, if the backend sent one
    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.read().current.as_ref().and_then(|s| s.user.clone())
    }

    /// Access token as it is right now, without waiting for a refresh
    pub fn current_access_token(&self) -> Option<String> {
        self.inner.read().current.as_ref().map(|s| s.credentials.access_token.clone())
    }

    /// Access token to attach to a protected request
    ///
    /// Waits for an in-flight refresh to settle so the request goes out with
    /// the replacement token instead of the one already rejected.
    pub async fn access_token(&self) -> Option<String> {
        if self.state() == SessionState::Refreshing {
            let _settled = self.refresh_lock.lock().await;
        }
        self.current_access_token()
    }

    /// Number of refresh exchanges performed by this session
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    /// Handle a 401 for a request sent with `rejected_token`
    ///
    /// Returns the access token to retransmit with. At most one exchange runs
    /// at a time; a caller whose rejected token has already been replaced
    /// gets the replacement without a second exchange.
    ///
    /// # Errors
    /// Returns `AuthExpired` when the session is anonymous, has no refresh
    /// token, or the exchange fails. In the last two cases the credentials
    /// are cleared first.
    #[instrument(skip_all, fields(rejected = %redact_token(rejected_token)))]
    pub async fn refresh_after_rejection(&self, rejected_token: &str) -> Result<String> {
        let _exclusive = self.refresh_lock.lock().await;

        let (credentials, generation) = {
            let inner = self.inner.read();
            match inner.current.as_ref() {
                Some(current) => (current.credentials.clone(), inner.generation),
                None => {
                    debug!("Session is anonymous, nothing to refresh");
                    return Err(VisadeskError::AuthExpired);
                }
            }
        };

        if credentials.access_token != rejected_token {
            debug!("Credentials already replaced by a previous refresh");
            return Ok(credentials.access_token);
        }

        let Some(refresh_token) = credentials.refresh_token.clone() else {
            warn!("Access token rejected and no refresh token is stored");
            self.expire(generation).await;
            return Err(VisadeskError::AuthExpired);
        };

        let mut guard = RefreshGuard::begin(self, generation);
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        info!("Access token rejected, exchanging refresh token");

        let outcome = self.refresher.refresh(&refresh_token).await;
        guard.disarm();

        match outcome {
            Ok(tokens) if !tokens.access_token.is_empty() => {
                self.commit_refresh(tokens, refresh_token, generation).await
            }
            Ok(_) => {
                warn!("Refresh response carried an empty access token");
                self.expire(generation).await;
                Err(VisadeskError::AuthExpired)
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, clearing credentials");
                self.expire(generation).await;
                Err(VisadeskError::AuthExpired)
            }
        }
    }

    async fn commit_refresh(
        &self,
        tokens: AuthTokens,
        previous_refresh: String,
        generation: u64,
    ) -> Result<String> {
        let snapshot = {
            let mut inner = self.inner.write();
            if inner.generation != generation {
                debug!("Session replaced during refresh, dropping exchanged tokens");
                return inner
                    .current
                    .as_ref()
                    .map(|s| s.credentials.access_token.clone())
                    .ok_or(VisadeskError::AuthExpired);
            }
            let Some(current) = inner.current.as_mut() else {
                return Err(VisadeskError::AuthExpired);
            };
            current.credentials = CredentialPair::new(
                tokens.access_token.clone(),
                tokens.refresh_token.or(Some(previous_refresh)),
            );
            if tokens.user.is_some() {
                current.user = tokens.user;
            }
            let snapshot = current.clone();
            inner.state = SessionState::Authenticated;
            snapshot
        };

        info!("Credentials refreshed");
        if let Err(err) = self.store.save(&snapshot).await {
            warn!(error = %err, "Failed to persist refreshed credentials");
        }
        Ok(snapshot.credentials.access_token)
    }

    /// Drop the session if it is still the one identified by `generation`
    async fn expire(&self, generation: u64) {
        {
            let mut inner = self.inner.write();
            if inner.generation != generation {
                return;
            }
            reset_locked(&mut inner);
        }
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "Failed to clear stored credentials");
        }
    }

    fn reset(&self) {
        reset_locked(&mut self.inner.write());
    }
}

fn reset_locked(inner: &mut Inner) {
    inner.generation += 1;
    inner.current = None;
    inner.state = SessionState::Anonymous;
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Session")
            .field("state", &inner.state)
            .field("generation", &inner.generation)
            .finish_non_exhaustive()
    }
}

/// Marks the session `Refreshing` for the duration of an exchange
///
/// If the exchange future is dropped before it completes, the session falls
/// back to `Authenticated` with the old credentials.
struct RefreshGuard<'a> {
    session: &'a Session,
    generation: u64,
    armed: bool,
}

impl<'a> RefreshGuard<'a> {
    fn begin(session: &'a Session, generation: u64) -> Self {
        let mut inner = session.inner.write();
        if inner.generation == generation {
            inner.state = SessionState::Refreshing;
        }
        Self { session, generation, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.session.inner.write();
        if inner.generation == self.generation && inner.state == SessionState::Refreshing {
            debug!("Refresh abandoned before completion");
            inner.state = SessionState::Authenticated;
        }
    }
}
