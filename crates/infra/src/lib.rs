//! # Visadesk Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The HTTP transport seam with its reqwest and in-process implementations
//! - The authenticated API client (bearer attachment, refresh on 401)
//! - Service adapters for cases, DS-160, statistics, translation,
//!   notifications and client links
//! - Credential stores (file, OS keychain) and the query cache
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `visadesk-core`
//! - Depends on `visadesk-domain`, `visadesk-common` and `visadesk-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod observability;
pub mod services;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, ApiClientConfig, RequestOptions};
pub use cache::QueryCache;
pub use context::AppContext;
pub use credentials::{FileCredentialStore, KeychainCredentialStore};
pub use errors::InfraError;
pub use http::{
    FakeTransport, HttpRequest, HttpResponse, ProgressReporter, ReqwestTransport, Transport,
    TransportError, UploadPayload,
};
pub use observability::{init_tracing, LogFormat};
pub use services::*;
