//! In-process transport answering from a route table
//!
//! Routes are matched on method and on the trailing segments of the URL
//! path, so `/cases/:id` matches `http://host/api/cases/42` whatever the
//! base path. Every request is recorded for later assertions.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;
use visadesk_domain::constants::UPLOAD_CHUNK_BYTES;

use super::transport::{HttpRequest, HttpResponse, RequestBody, Transport, TransportError};

/// Produces the outcome of one matched request
pub type FakeResponder =
    Arc<dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync>;

struct Route {
    method: Method,
    segments: Vec<String>,
    responder: FakeResponder,
}

fn split_path(path: &str) -> Vec<String> {
    path.trim_matches('/').split('/').map(str::to_string).collect()
}

/// Whether the trailing segments of `path` match `pattern`
fn tail_matches(pattern: &[String], path: &str) -> bool {
    let actual: Vec<&str> = path.trim_matches('/').split('/').collect();
    if actual.len() < pattern.len() {
        return false;
    }
    let tail = &actual[actual.len() - pattern.len()..];
    pattern.iter().zip(tail).all(|(expected, actual)| expected.starts_with(':') || expected == actual)
}

/// Transport that never touches the network
#[derive(Clone, Default)]
pub struct FakeTransport {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a responder; later registrations win over earlier ones
    pub fn route<F>(&self, method: Method, path: &str, responder: F) -> &Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        let segments = split_path(path);
        self.routes.lock().push(Route { method, segments, responder: Arc::new(responder) });
        self
    }

    /// Answer with a fixed status and JSON body
    pub fn json(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.route(method, path, move |_| Ok(HttpResponse::json(status, &body)))
    }

    /// Fail every matching request without a response
    pub fn fail(&self, method: Method, path: &str, error: TransportError) -> &Self {
        self.route(method, path, move |_| Err(error.clone()))
    }

    /// Delay every response, to exercise timeouts and cancellation
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received for `method` and `path`
    pub fn count(&self, method: &Method, path: &str) -> usize {
        let pattern = split_path(path);
        self.requests
            .lock()
            .iter()
            .filter(|r| &r.method == method && tail_matches(&pattern, r.url.path()))
            .count()
    }

    fn respond(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let responder = self
            .routes
            .lock()
            .iter()
            .rev()
            .find(|route| {
                route.method == request.method && tail_matches(&route.segments, request.url.path())
            })
            .map(|route| route.responder.clone());

        match responder {
            Some(responder) => responder(request),
            None => {
                debug!(method = %request.method, path = request.url.path(), "no fake route");
                let message = format!("No fake route for {} {}", request.method, request.url.path());
                Ok(HttpResponse::json(StatusCode::NOT_FOUND, &json!({ "message": message })))
            }
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            if latency >= request.timeout {
                tokio::time::sleep(request.timeout).await;
                return Err(TransportError::Timeout(request.timeout));
            }
            tokio::time::sleep(latency).await;
        }

        if let RequestBody::Multipart(payload) = &request.body {
            if let Some(progress) = &payload.progress {
                let total = payload.len();
                let mut sent = 0;
                while sent < total {
                    sent = (sent + UPLOAD_CHUNK_BYTES).min(total);
                    progress.bytes(sent, total);
                    tokio::task::yield_now().await;
                }
            }
        }

        self.respond(&request)
    }
}

impl std::fmt::Debug for FakeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeTransport")
            .field("routes", &self.routes.lock().len())
            .field("requests", &self.requests.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn get(url: &str) -> HttpRequest {
        HttpRequest::new(Method::GET, Url::parse(url).unwrap(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn matches_trailing_segments_and_params() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/cases/:id", 200, json!({"id": "any"}));

        let response = fake.send(get("http://fake.local/api/cases/42")).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);

        let missing = fake.send(get("http://fake.local/api/cases")).await.unwrap();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(fake.count(&Method::GET, "/cases/:id"), 1);
    }

    #[tokio::test]
    async fn later_routes_override_earlier_ones() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/health", 503, json!({}));
        fake.json(Method::GET, "/health", 200, json!({"status": "ok"}));

        let response = fake.send(get("http://fake.local/health")).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn latency_beyond_timeout_times_out() {
        let fake = FakeTransport::new();
        fake.json(Method::GET, "/slow", 200, json!({}));
        fake.set_latency(Duration::from_secs(5));

        let mut request = get("http://fake.local/slow");
        request.timeout = Duration::from_millis(10);
        assert_eq!(
            fake.send(request).await,
            Err(TransportError::Timeout(Duration::from_millis(10)))
        );
    }
}
