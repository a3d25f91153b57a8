//! Backend authentication endpoints
//!
//! [`HttpAuthGateway`] serves login and password reset through the
//! [`ApiClient`]. [`HttpTokenRefresher`] talks to the transport directly: it
//! runs while the session holds its refresh lock, so it must not go back
//! through the client that waits on that lock.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, instrument};
use url::Url;
use visadesk_common::privacy::mask_email;
use visadesk_core::{AuthPort, TokenRefresher};
use visadesk_domain::{AuthTokens, LoginRequest, Result, VisadeskError};

use super::client::{ApiClient, ApiClientConfig, RequestOptions};
use super::errors::error_from_response;
use crate::errors::InfraError;
use crate::http::{HttpRequest, RequestBody, Transport};

/// [`AuthPort`] over HTTP
pub struct HttpAuthGateway {
    client: Arc<ApiClient>,
}

impl HttpAuthGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthPort for HttpAuthGateway {
    #[instrument(skip_all, fields(email = %mask_email(&request.email)))]
    async fn login(&self, request: &LoginRequest) -> Result<AuthTokens> {
        let body = serde_json::to_value(request)?;
        let tokens: AuthTokens = self
            .client
            .request_as(Method::POST, "/auth/login", Some(body), RequestOptions::new().public())
            .await?;
        info!("login accepted");
        Ok(tokens)
    }

    #[instrument(skip_all, fields(email = %mask_email(email)))]
    async fn request_password_reset(&self, email: &str) -> Result<()> {
        let body = json!({ "email": email });
        let _: serde_json::Value = self
            .client
            .request_as(
                Method::POST,
                "/auth/forgot-password",
                Some(body),
                RequestOptions::new().public(),
            )
            .await?;
        Ok(())
    }
}

/// [`TokenRefresher`] calling `POST /auth/refresh`
pub struct HttpTokenRefresher {
    transport: Arc<dyn Transport>,
    config: ApiClientConfig,
}

impl HttpTokenRefresher {
    pub fn new(transport: Arc<dyn Transport>, config: ApiClientConfig) -> Self {
        Self { transport, config }
    }

    fn endpoint(&self) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        Url::parse(&format!("{base}/auth/refresh")).map_err(|err| InfraError::from(err).into())
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens> {
        let mut request = HttpRequest::new(Method::POST, self.endpoint()?, self.config.timeout);
        request.body = RequestBody::Json(json!({ "refreshToken": refresh_token }));

        let response = self.transport.send(request).await.map_err(InfraError::from)?;
        if !response.is_success() {
            debug!(status = %response.status, "refresh rejected");
            return Err(error_from_response(response.status, &response.body));
        }

        let tokens: AuthTokens = response.parse()?;
        if tokens.access_token.is_empty() {
            return Err(VisadeskError::Decode("refresh response carried no access token".into()));
        }
        Ok(tokens)
    }
}
