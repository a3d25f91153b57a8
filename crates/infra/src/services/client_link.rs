//! Applicant-facing client link endpoints
//!
//! These paths are public: the link token in the URL is the credential.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument};
use visadesk_common::privacy::mask_link_token;
use visadesk_core::ClientFormPort;
use visadesk_domain::constants::MAX_UPLOAD_BYTES;
use visadesk_domain::{FieldError, LinkValidation, Result, SectionUpdate, UploadedDocument, VisadeskError};

use crate::api::{api_path, ApiClient, RequestOptions};
use crate::http::{ProgressReporter, UploadPayload};

/// [`ClientFormPort`] over HTTP, plus document upload
pub struct ClientLinkApi {
    client: Arc<ApiClient>,
}

impl ClientLinkApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Upload a supporting document for the applicant behind `token`
    ///
    /// # Errors
    /// `Validation` for empty or oversized files, before any request;
    /// otherwise the client's error contract
    #[instrument(skip_all, fields(token = %mask_link_token(token), file = %file.file_name))]
    pub async fn upload(
        &self,
        token: &str,
        file: UploadPayload,
        on_progress: Option<ProgressReporter>,
    ) -> Result<UploadedDocument> {
        check_upload(&file)?;
        let path = api_path(&["client", "upload", token]);
        let document: UploadedDocument =
            self.client.upload(&path, file, on_progress, RequestOptions::new().public()).await?;
        info!(document_id = %document.id, "document uploaded");
        Ok(document)
    }
}

fn check_upload(file: &UploadPayload) -> Result<()> {
    let mut errors = Vec::new();
    if file.file_name.trim().is_empty() {
        errors.push(FieldError::new("file", "File name is required").with_code("required"));
    }
    if file.is_empty() {
        errors.push(FieldError::new("file", "File is empty").with_code("empty"));
    } else if file.len() > MAX_UPLOAD_BYTES {
        errors.push(
            FieldError::new("file", format!("File exceeds {} MB", MAX_UPLOAD_BYTES / (1024 * 1024)))
                .with_code("too_large"),
        );
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(VisadeskError::Validation(errors))
    }
}

#[async_trait]
impl ClientFormPort for ClientLinkApi {
    #[instrument(skip_all, fields(token = %mask_link_token(token)))]
    async fn validate(&self, token: &str) -> Result<LinkValidation> {
        let path = api_path(&["client", "validate", token]);
        self.client.request_as(Method::GET, &path, None, RequestOptions::new().public()).await
    }

    #[instrument(skip_all, fields(token = %mask_link_token(token), section = %update.section))]
    async fn save_section(&self, token: &str, update: &SectionUpdate) -> Result<()> {
        let path = api_path(&["client", "form", token]);
        let body = serde_json::to_value(update)?;
        let _: Value =
            self.client.request_as(Method::PUT, &path, Some(body), RequestOptions::new().public()).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(token = %mask_link_token(token)))]
    async fn submit(&self, token: &str) -> Result<()> {
        let path = api_path(&["client", "submit", token]);
        let _: Value =
            self.client.request_as(Method::POST, &path, None, RequestOptions::new().public()).await?;
        Ok(())
    }
}
