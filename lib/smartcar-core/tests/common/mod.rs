#![allow(dead_code, missing_docs, clippy::expect_used, clippy::missing_panics_doc)]
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use smartcar_core::Environment;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Serves a canned response on every path and records incoming requests.
pub struct MockServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn start(status: StatusCode, body: Value) -> impl Future<Output = anyhow::Result<Self>> {
        Self::serve(status, body.to_string(), Duration::ZERO)
    }

    pub fn ok(body: Value) -> impl Future<Output = anyhow::Result<Self>> {
        Self::start(StatusCode::OK, body)
    }

    /// Answers with `body` as is, even when it is not valid JSON.
    pub fn raw(body: impl Into<String>) -> impl Future<Output = anyhow::Result<Self>> {
        Self::serve(StatusCode::OK, body.into(), Duration::ZERO)
    }

    /// Waits `delay` before answering each request.
    pub fn delayed(body: Value, delay: Duration) -> impl Future<Output = anyhow::Result<Self>> {
        Self::serve(StatusCode::OK, body.to_string(), delay)
    }

    async fn serve(status: StatusCode, body: String, delay: Duration) -> anyhow::Result<Self> {
        init_tracing();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body,
            delay,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server runs");
        });
        info!(%addr, "mock server started");

        Ok(Self {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn environment(&self) -> Environment {
        Environment::single_host(&self.base_url).expect("valid mock URL")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("not poisoned").clone()
    }

    pub fn single_request(&self) -> RecordedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(ToString::to_string),
        headers,
        body,
    };
    state
        .requests
        .lock()
        .expect("not poisoned")
        .push(request);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (state.status, [(CONTENT_TYPE, "application/json")], state.body)
}
