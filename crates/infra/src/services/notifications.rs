//! Notification endpoints

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;
use visadesk_core::NotificationsPort;
use visadesk_domain::{Notification, Result, UnreadCount};

use crate::api::{api_path, ApiClient, RequestOptions};

/// [`NotificationsPort`] over HTTP
pub struct NotificationsApi {
    client: Arc<ApiClient>,
}

impl NotificationsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn put_empty(&self, path: &str) -> Result<()> {
        let _: Value = self.client.request_as(Method::PUT, path, None, RequestOptions::new()).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationsPort for NotificationsApi {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Notification>> {
        self.client.get("/notifications").await
    }

    #[instrument(skip(self))]
    async fn unread_count(&self) -> Result<u64> {
        let unread: UnreadCount = self.client.get("/notifications/unread-count").await?;
        Ok(unread.count)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: &str) -> Result<()> {
        self.put_empty(&api_path(&["notifications", id, "read"])).await
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self) -> Result<()> {
        self.put_empty("/notifications/read-all").await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::FakeTransport;
    use crate::services::test_support::signed_in_client;

    #[tokio::test]
    async fn unread_count_accepts_either_field_name() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/notifications/unread-count", 200, json!({"unread": 3}));
        let notifications = NotificationsApi::new(signed_in_client(&fake).await);

        assert_eq!(notifications.unread_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn mark_read_accepts_no_content() {
        let fake = FakeTransport::new();
        fake.json(Method::PUT, "/notifications/:id/read", 204, json!(null));
        fake.route(Method::PUT, "/notifications/read-all", |_| {
            Ok(crate::http::HttpResponse::new(reqwest::StatusCode::NO_CONTENT, ""))
        });
        let notifications = NotificationsApi::new(signed_in_client(&fake).await);

        notifications.mark_read("n1").await.unwrap();
        notifications.mark_all_read().await.unwrap();
        assert_eq!(fake.count(&Method::PUT, "/notifications/n1/read"), 1);
    }

    #[tokio::test]
    async fn list_parses_notifications() {
        let fake = FakeTransport::new();
        fake.json(
            Method::GET,
            "/notifications",
            200,
            json!([{
                "id": "n1",
                "type": "form_submitted",
                "title": "Form submitted",
                "caseId": "c1",
                "createdAt": "2026-03-01T08:00:00Z"
            }]),
        );
        let notifications = NotificationsApi::new(signed_in_client(&fake).await);

        let list = notifications.list().await.unwrap();
        assert_eq!(list[0].kind, "form_submitted");
        assert!(!list[0].read);
    }
}
