//! Statistics port
//!
//! Dashboard figures are computed by the backend; the client only reads them.

use async_trait::async_trait;
use visadesk_domain::{Result, StatisticsOverview};

#[async_trait]
pub trait StatisticsPort: Send + Sync {
    /// Headline counters and recent activity for the dashboard
    async fn overview(&self) -> Result<StatisticsOverview>;
}
