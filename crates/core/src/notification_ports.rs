//! Notification port

use async_trait::async_trait;
use visadesk_domain::{Notification, Result};

#[async_trait]
pub trait NotificationsPort: Send + Sync {
    /// Most recent notifications for the signed-in user
    async fn list(&self) -> Result<Vec<Notification>>;

    async fn unread_count(&self) -> Result<u64>;

    async fn mark_read(&self, id: &str) -> Result<()>;

    async fn mark_all_read(&self) -> Result<()>;
}
