//! Translation comparison port

use async_trait::async_trait;
use visadesk_domain::{Result, TranslationComparison, TranslationField};

/// Side-by-side view of original and translated answers for a case
#[async_trait]
pub trait TranslationPort: Send + Sync {
    async fn comparison(&self, case_id: &str) -> Result<TranslationComparison>;

    /// Replace the translated value of one field
    async fn update_field(&self, case_id: &str, field: &str, value: &str)
        -> Result<TranslationField>;
}
