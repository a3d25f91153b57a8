//! Staff-side DS-160 endpoints

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, instrument};
use visadesk_core::{validate_section, Ds160Port};
use visadesk_domain::{Ds160Form, Result, SectionUpdate};

use crate::api::{api_path, ApiClient, RequestOptions};

/// [`Ds160Port`] over HTTP
pub struct Ds160Api {
    client: Arc<ApiClient>,
}

impl Ds160Api {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Ds160Port for Ds160Api {
    #[instrument(skip(self))]
    async fn get(&self, case_id: &str) -> Result<Ds160Form> {
        self.client.get(&api_path(&["cases", case_id, "ds160"])).await
    }

    #[instrument(skip(self, update), fields(section = %update.section))]
    async fn save_section(&self, case_id: &str, update: &SectionUpdate) -> Result<Ds160Form> {
        validate_section(update.section, &update.data)?;
        self.client.put(&api_path(&["cases", case_id, "ds160"]), update).await
    }

    #[instrument(skip(self))]
    async fn submit(&self, case_id: &str) -> Result<Ds160Form> {
        let path = api_path(&["cases", case_id, "ds160", "submit"]);
        let form: Ds160Form =
            self.client.request_as(Method::POST, &path, None, RequestOptions::new()).await?;
        info!(status = %form.status, "DS-160 submitted");
        Ok(form)
    }
}
