//! Port interfaces for DS-160 forms

use async_trait::async_trait;
use visadesk_domain::{Ds160Form, LinkValidation, Result, SectionUpdate};

/// Tokenized endpoints used by the applicant
#[async_trait]
pub trait ClientFormPort: Send + Sync {
    /// Check a client link and fetch the sections saved so far
    async fn validate(&self, token: &str) -> Result<LinkValidation>;

    async fn save_section(&self, token: &str, update: &SectionUpdate) -> Result<()>;

    async fn submit(&self, token: &str) -> Result<()>;
}

/// DS-160 endpoints used by staff on behalf of a case
#[async_trait]
pub trait Ds160Port: Send + Sync {
    async fn get(&self, case_id: &str) -> Result<Ds160Form>;

    async fn save_section(&self, case_id: &str, update: &SectionUpdate) -> Result<Ds160Form>;

    async fn submit(&self, case_id: &str) -> Result<Ds160Form>;
}
