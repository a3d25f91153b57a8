//! Case endpoints with read-through caching
//!
//! # Caching Strategy
//!
//! - **Read-through**: list, get and diagnosis go through the [`QueryCache`]
//! - **Write invalidation**: any mutation drops every `cases:` entry and the
//!   dashboard statistics, which count cases by status

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, instrument};
use visadesk_core::{validate_case_update, validate_new_case, CasesPort};
use visadesk_domain::{Case, CaseQuery, CaseUpdate, ClientLink, Diagnosis, NewCase, Page, Result};

use super::statistics::STATISTICS_CACHE_PREFIX;
use crate::api::{api_path, ApiClient, RequestOptions};
use crate::cache::QueryCache;

const CASES_CACHE_PREFIX: &str = "cases:";

/// [`CasesPort`] over HTTP
pub struct CasesApi {
    client: Arc<ApiClient>,
    cache: QueryCache,
}

impl CasesApi {
    pub fn new(client: Arc<ApiClient>, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    async fn invalidate(&self) {
        self.cache.invalidate_prefix(CASES_CACHE_PREFIX).await;
        self.cache.invalidate_prefix(STATISTICS_CACHE_PREFIX).await;
    }
}

fn list_key(query: &CaseQuery) -> String {
    let pairs: Vec<String> = query.to_pairs().iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{CASES_CACHE_PREFIX}list:{}", pairs.join("&"))
}

#[async_trait]
impl CasesPort for CasesApi {
    #[instrument(skip(self))]
    async fn list(&self, query: &CaseQuery) -> Result<Page<Case>> {
        self.cache
            .get_or_fetch(&list_key(query), || {
                let options = RequestOptions::new().query(query.to_pairs());
                self.client.request_as(Method::GET, "/cases", None, options)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Case> {
        let key = format!("{CASES_CACHE_PREFIX}get:{id}");
        let path = api_path(&["cases", id]);
        self.cache.get_or_fetch(&key, || self.client.get(&path)).await
    }

    #[instrument(skip_all)]
    async fn create(&self, new_case: &NewCase) -> Result<Case> {
        validate_new_case(new_case)?;
        let case: Case = self.client.post("/cases", new_case).await?;
        self.invalidate().await;
        info!(case_id = %case.id, "case created");
        Ok(case)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: &CaseUpdate) -> Result<Case> {
        validate_case_update(patch)?;
        let case: Case = self.client.put(&api_path(&["cases", id]), patch).await?;
        self.invalidate().await;
        Ok(case)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.client.delete(&api_path(&["cases", id])).await?;
        self.invalidate().await;
        info!(case_id = %id, "case deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn generate_link(&self, id: &str) -> Result<ClientLink> {
        let path = api_path(&["cases", id, "generate-link"]);
        let link: ClientLink =
            self.client.request_as(Method::POST, &path, None, RequestOptions::new()).await?;
        // The case moves to `link_sent`.
        self.invalidate().await;
        Ok(link)
    }

    #[instrument(skip(self))]
    async fn diagnosis(&self, id: &str) -> Result<Diagnosis> {
        let key = format!("{CASES_CACHE_PREFIX}diagnosis:{id}");
        let path = api_path(&["cases", id, "diagnosis"]);
        self.cache.get_or_fetch(&key, || self.client.get(&path)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use visadesk_domain::{ApplicantSummary, CaseStatus, VisadeskError};

    use super::*;
    use crate::http::FakeTransport;
    use crate::services::test_support::{cache_for, signed_in_client};

    fn case_json(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "applicant": {"firstName": "Ana", "lastName": "Silva", "email": "ana@example.com"},
            "visaType": "B1/B2",
            "status": status,
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-05T10:00:00Z"
        })
    }

    async fn api(fake: &FakeTransport) -> CasesApi {
        let client = signed_in_client(fake).await;
        let cache = cache_for(&client);
        CasesApi::new(client, cache)
    }

    #[tokio::test]
    async fn list_is_cached_per_query() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/cases", 200, json!([case_json("c1", "draft")]));
        let cases = api(&fake).await;

        let drafts = CaseQuery { status: Some(CaseStatus::Draft), ..Default::default() };
        assert_eq!(cases.list(&drafts).await.unwrap().items.len(), 1);
        cases.list(&drafts).await.unwrap();
        cases.list(&CaseQuery::default()).await.unwrap();

        assert_eq!(fake.count(&Method::GET, "/cases"), 2);
        let first = &fake.requests()[0];
        assert_eq!(first.url.query(), Some("status=draft"));
    }

    #[tokio::test]
    async fn mutation_invalidates_reads() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/cases/:id", 200, case_json("c1", "draft"));
        fake.json(Method::PUT, "/cases/:id", 200, case_json("c1", "in_progress"));
        let cases = api(&fake).await;

        cases.get("c1").await.unwrap();
        cases.get("c1").await.unwrap();
        assert_eq!(fake.count(&Method::GET, "/cases/:id"), 1);

        let patch = CaseUpdate { status: Some(CaseStatus::InProgress), ..Default::default() };
        let updated = cases.update("c1", &patch).await.unwrap();
        assert_eq!(updated.status, CaseStatus::InProgress);

        cases.get("c1").await.unwrap();
        assert_eq!(fake.count(&Method::GET, "/cases/:id"), 2);
    }

    #[tokio::test]
    async fn cached_list_is_not_served_after_sign_out() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/cases", 200, json!([case_json("c1", "draft")]));
        let client = signed_in_client(&fake).await;
        let cases = CasesApi::new(client.clone(), cache_for(&client));

        cases.list(&CaseQuery::default()).await.unwrap();
        client.session().sign_out().await.unwrap();

        let err = cases.list(&CaseQuery::default()).await.unwrap_err();
        assert!(matches!(err, VisadeskError::AuthExpired));
        assert_eq!(fake.count(&Method::GET, "/cases"), 1);
    }

    #[tokio::test]
    async fn invalid_new_case_is_rejected_before_sending() {
        let fake = FakeTransport::new();
        let cases = api(&fake).await;

        let new_case = NewCase {
            applicant: ApplicantSummary {
                first_name: String::new(),
                last_name: "Silva".into(),
                email: "not-an-email".into(),
                phone: None,
            },
            visa_type: "B1/B2".into(),
            notes: None,
        };
        let err = cases.create(&new_case).await.unwrap_err();

        assert!(matches!(err, VisadeskError::Validation(_)));
        assert!(err.field_errors().len() >= 2);
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn ids_are_percent_encoded() {
        let fake = FakeTransport::new();
        fake.json(Method::POST, "/generate-link", 200, json!({"token": "t1", "url": "https://x/t1"}));
        let cases = api(&fake).await;

        cases.generate_link("a/b").await.unwrap();
        assert_eq!(fake.requests()[0].url.path(), "/api/cases/a%2Fb/generate-link");
    }

    #[tokio::test]
    async fn missing_case_surfaces_api_error() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/cases/:id", 404, json!({"message": "Case not found"}));
        let cases = api(&fake).await;

        let err = cases.get("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "API error 404: Case not found");
    }
}
