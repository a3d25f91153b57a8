//! Port interfaces for case management

use async_trait::async_trait;
use visadesk_domain::{Case, CaseQuery, CaseUpdate, ClientLink, Diagnosis, NewCase, Page, Result};

/// Trait for the case endpoints
#[async_trait]
pub trait CasesPort: Send + Sync {
    /// List cases matching `query`
    async fn list(&self, query: &CaseQuery) -> Result<Page<Case>>;

    async fn get(&self, id: &str) -> Result<Case>;

    async fn create(&self, new_case: &NewCase) -> Result<Case>;

    /// Apply a partial update
    async fn update(&self, id: &str, patch: &CaseUpdate) -> Result<Case>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Issue a client link for the applicant of `id`
    async fn generate_link(&self, id: &str) -> Result<ClientLink>;

    /// AI diagnosis computed by the backend
    async fn diagnosis(&self, id: &str) -> Result<Diagnosis>;
}
