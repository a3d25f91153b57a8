//! HTTP adapters for the core service ports
//!
//! Each adapter maps one group of backend endpoints onto its port in
//! `visadesk-core`. Reads of cases and statistics go through the shared
//! [`QueryCache`](crate::cache::QueryCache).

pub mod cases;
pub mod client_link;
pub mod ds160;
pub mod notifications;
pub mod statistics;
pub mod translation;

pub use cases::CasesApi;
pub use client_link::ClientLinkApi;
pub use ds160::Ds160Api;
pub use notifications::NotificationsApi;
pub use statistics::StatisticsApi;
pub use translation::TranslationApi;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use visadesk_core::{InMemoryCredentialStore, Session, TokenRefresher};
    use visadesk_domain::{AuthTokens, CacheConfig, CredentialPair, Result, StoredSession, VisadeskError};

    use crate::api::{ApiClient, ApiClientConfig};
    use crate::cache::QueryCache;
    use crate::http::FakeTransport;

    struct NoRefresh;

    #[async_trait]
    impl TokenRefresher for NoRefresh {
        async fn refresh(&self, _refresh_token: &str) -> Result<AuthTokens> {
            Err(VisadeskError::api(401, "refresh disabled"))
        }
    }

    fn client(fake: &FakeTransport, session: Arc<Session>) -> Arc<ApiClient> {
        let config = ApiClientConfig { base_url: "http://fake.local/api".into(), ..Default::default() };
        Arc::new(ApiClient::new(config, Arc::new(fake.clone()), session).unwrap())
    }

    fn session() -> Arc<Session> {
        Arc::new(Session::new(Arc::new(InMemoryCredentialStore::new()), Arc::new(NoRefresh)))
    }

    pub(crate) fn anonymous_client(fake: &FakeTransport) -> Arc<ApiClient> {
        client(fake, session())
    }

    pub(crate) async fn signed_in_client(fake: &FakeTransport) -> Arc<ApiClient> {
        let session = session();
        session
            .sign_in(StoredSession {
                credentials: CredentialPair::new("staff-token", Some("staff-refresh".into())),
                user: None,
                remember_me: false,
            })
            .await
            .unwrap();
        client(fake, session)
    }

    pub(crate) fn cache_for(client: &ApiClient) -> QueryCache {
        QueryCache::new(&CacheConfig { ttl_secs: 60, max_entries: 100 })
            .scoped_to(client.session().clone())
    }
}
