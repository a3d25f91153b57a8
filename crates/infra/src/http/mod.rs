//! HTTP transport layer
//!
//! [`Transport`] is the seam between the API client and the wire. The
//! reqwest implementation talks to the real backend; [`FakeTransport`]
//! answers from an in-process route table for tests and local development.

mod client;
mod demo;
mod fake;
mod progress;
mod transport;

pub use client::{ReqwestTransport, ReqwestTransportBuilder};
pub use demo::{demo_backend, DEMO_EMAIL, DEMO_PASSWORD};
pub use fake::{FakeResponder, FakeTransport};
pub use progress::ProgressReporter;
pub use transport::{
    HttpRequest, HttpResponse, RequestBody, Transport, TransportError, UploadPayload,
};
