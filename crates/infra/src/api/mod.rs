//! Backend API client
//!
//! Every outbound call to the case-management backend goes through
//! [`ApiClient`]: bearer attachment, error-body parsing, a single coalesced
//! refresh on 401, cancellation and per-request timeouts.

pub mod auth;
pub mod client;
pub mod errors;

pub use auth::{HttpAuthGateway, HttpTokenRefresher};
pub use client::{api_path, ApiClient, ApiClientBuilder, ApiClientConfig, RequestOptions};
pub use errors::error_from_response;
