//! Dashboard statistics

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use visadesk_core::StatisticsPort;
use visadesk_domain::{Result, StatisticsOverview};

use crate::api::ApiClient;
use crate::cache::QueryCache;

pub(crate) const STATISTICS_CACHE_PREFIX: &str = "statistics:";

/// [`StatisticsPort`] over HTTP, cached until a case changes or the TTL
/// expires
pub struct StatisticsApi {
    client: Arc<ApiClient>,
    cache: QueryCache,
}

impl StatisticsApi {
    pub fn new(client: Arc<ApiClient>, cache: QueryCache) -> Self {
        Self { client, cache }
    }
}

#[async_trait]
impl StatisticsPort for StatisticsApi {
    #[instrument(skip(self))]
    async fn overview(&self) -> Result<StatisticsOverview> {
        let key = format!("{STATISTICS_CACHE_PREFIX}overview");
        self.cache.get_or_fetch(&key, || self.client.get("/statistics/overview")).await
    }
}
