//! Translation comparison endpoints

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;
use visadesk_core::TranslationPort;
use visadesk_domain::{Result, TranslationComparison, TranslationField, VisadeskError};

use crate::api::{api_path, ApiClient};

/// [`TranslationPort`] over HTTP
pub struct TranslationApi {
    client: Arc<ApiClient>,
}

impl TranslationApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranslationPort for TranslationApi {
    #[instrument(skip(self))]
    async fn comparison(&self, case_id: &str) -> Result<TranslationComparison> {
        self.client.get(&api_path(&["cases", case_id, "translation", "comparison"])).await
    }

    #[instrument(skip(self, value))]
    async fn update_field(
        &self,
        case_id: &str,
        field: &str,
        value: &str,
    ) -> Result<TranslationField> {
        if field.trim().is_empty() {
            return Err(VisadeskError::invalid_field("field", "Field name is required"));
        }
        let path = api_path(&["cases", case_id, "translation", field]);
        self.client.put(&path, &json!({ "value": value })).await
    }
}
