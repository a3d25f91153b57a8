//! Application context - dependency injection container
//!
//! Wires the credential store, transport, session, API client and service
//! adapters selected by [`Config`]. Front ends hold one [`AppContext`] for
//! the lifetime of the process.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use visadesk_core::{
    AuthService, CasesPort, ClientFormWorkflow, CredentialStore, Ds160Port, InMemoryCredentialStore,
    InMemoryDraftStore, NotificationsPort, Session, StatisticsPort, TranslationPort,
};
use visadesk_domain::{Config, CredentialBackend, Result, SessionState, TransportMode};

use crate::api::{ApiClient, ApiClientConfig, HttpAuthGateway, HttpTokenRefresher};
use crate::cache::QueryCache;
use crate::config;
use crate::credentials::{FileCredentialStore, KeychainCredentialStore};
use crate::errors::InfraError;
use crate::http::{demo_backend, ReqwestTransport, Transport};
use crate::services::{
    CasesApi, ClientLinkApi, Ds160Api, NotificationsApi, StatisticsApi, TranslationApi,
};

/// Type alias for cases port trait object
type DynCasesPort = dyn CasesPort + Send + Sync + 'static;

/// Type alias for DS-160 port trait object
type DynDs160Port = dyn Ds160Port + Send + Sync + 'static;

/// Type alias for statistics port trait object
type DynStatisticsPort = dyn StatisticsPort + Send + Sync + 'static;

/// Type alias for translation port trait object
type DynTranslationPort = dyn TranslationPort + Send + Sync + 'static;

/// Type alias for notifications port trait object
type DynNotificationsPort = dyn NotificationsPort + Send + Sync + 'static;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub session: Arc<Session>,
    pub client: Arc<ApiClient>,
    pub cache: QueryCache,

    // Staff-facing services
    pub auth: Arc<AuthService>,
    pub cases: Arc<DynCasesPort>,
    pub ds160: Arc<DynDs160Port>,
    pub statistics: Arc<DynStatisticsPort>,
    pub translation: Arc<DynTranslationPort>,
    pub notifications: Arc<DynNotificationsPort>,

    // Applicant-facing services
    pub client_links: Arc<ClientLinkApi>,
    pub client_forms: Arc<ClientFormWorkflow>,
}

impl AppContext {
    /// Load configuration from the environment and build the context
    pub async fn from_env() -> Result<Self> {
        Self::new(config::load()?).await
    }

    /// Build the context with the transport and credential store `config`
    /// selects, then restore any persisted session
    pub async fn new(config: Config) -> Result<Self> {
        let transport = build_transport(&config)?;
        let store = build_store(&config);
        Self::with_parts(config, transport, store).await
    }

    /// Build the context around an explicit transport and store
    pub async fn with_parts(
        config: Config,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let client_config = ApiClientConfig::from(&config.api);
        let refresher = Arc::new(HttpTokenRefresher::new(transport.clone(), client_config.clone()));
        let session = Arc::new(Session::new(store, refresher));
        let client = Arc::new(ApiClient::new(client_config, transport, session.clone())?);
        let cache = QueryCache::new(&config.cache).scoped_to(session.clone());

        let auth = Arc::new(AuthService::new(
            Arc::new(HttpAuthGateway::new(client.clone())),
            session.clone(),
        ));
        let client_links = Arc::new(ClientLinkApi::new(client.clone()));
        let client_forms = Arc::new(ClientFormWorkflow::new(
            client_links.clone(),
            Arc::new(InMemoryDraftStore::new()),
        ));

        let state = session.initialize().await?;
        info!(
            base_url = %config.api.base_url,
            transport = %config.transport,
            backend = %config.storage.backend,
            ?state,
            "application context ready"
        );

        Ok(Self {
            cases: Arc::new(CasesApi::new(client.clone(), cache.clone())),
            ds160: Arc::new(Ds160Api::new(client.clone())),
            statistics: Arc::new(StatisticsApi::new(client.clone(), cache.clone())),
            translation: Arc::new(TranslationApi::new(client.clone())),
            notifications: Arc::new(NotificationsApi::new(client.clone())),
            config,
            session,
            client,
            cache,
            auth,
            client_links,
            client_forms,
        })
    }

    /// Current lifecycle state of the session
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Sign out and drop every cached response
    pub async fn sign_out(&self) -> Result<()> {
        self.cache.clear();
        self.auth.logout().await
    }
}

fn build_transport(config: &Config) -> Result<Arc<dyn Transport>> {
    match config.transport {
        TransportMode::Http => {
            let transport = ReqwestTransport::builder()
                .timeout(Duration::from_secs(config.api.timeout_secs))
                .user_agent(config.api.user_agent.clone())
                .build()
                .map_err(InfraError::from)?;
            Ok(Arc::new(transport))
        }
        TransportMode::Fake => Ok(Arc::new(demo_backend())),
    }
}

fn build_store(config: &Config) -> Arc<dyn CredentialStore> {
    match config.storage.backend {
        CredentialBackend::Memory => Arc::new(InMemoryCredentialStore::new()),
        CredentialBackend::File => Arc::new(FileCredentialStore::new(&config.storage.path)),
        CredentialBackend::Keychain => {
            Arc::new(KeychainCredentialStore::new(config.storage.service_name.clone()))
        }
    }
}
