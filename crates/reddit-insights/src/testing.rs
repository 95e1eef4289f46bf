//! Test utilities for reddit-insights
//!
//! [`MockApi`] is a scripted stand-in for the Reddit Insights service that
//! records every request it receives. [`TestServer`] serves any axum router
//! on an ephemeral local port and hands back a client pointed at it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::error::RedditInsightsError;
use crate::{RedditInsightsClient, Result};

/// API key the test server's client is configured with
pub const TEST_API_KEY: &str = "test-api-key";

/// A request captured by [`MockApi`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lower-case
    pub headers: HashMap<String, String>,
    /// Parsed JSON body, `None` when the body was empty or not JSON
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Path plus `?query` as it appeared on the wire
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

struct MockState {
    status: u16,
    body: String,
    delay: Option<Duration>,
    requests: Vec<RecordedRequest>,
}

/// Scripted API that answers every request with the same status and body
#[derive(Clone)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    /// Respond with `status` and the given JSON document
    pub fn respond_json(status: u16, body: Value) -> Self {
        Self::respond_raw(status, body.to_string())
    }

    /// Respond with `status` and an arbitrary body (e.g. an HTML error page)
    pub fn respond_raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                status,
                body: body.into(),
                delay: None,
                requests: Vec::new(),
            })),
        }
    }

    /// `200 {"success": true, "data": data}`
    pub fn success(data: Value) -> Self {
        Self::respond_json(200, serde_json::json!({ "success": true, "data": data }))
    }

    /// Hold every response back for `delay`
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().delay = Some(delay);
        self
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Router answering every path and method
    pub fn router(&self) -> axum::Router {
        axum::Router::new()
            .fallback(handle_mock_request)
            .with_state(self.clone())
    }
}

async fn handle_mock_request(
    State(api): State<MockApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: serde_json::from_slice(&body).ok(),
    };

    let (status, reply, delay) = {
        let mut state = api.state.lock();
        state.requests.push(recorded);
        (state.status, state.body.clone(), state.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], reply).into_response()
}

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: RedditInsightsClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve a router and build a client against it
    ///
    /// # Example
    ///
    /// ```ignore
    /// use reddit_insights::testing::{MockApi, TestServer};
    ///
    /// let api = MockApi::success(serde_json::json!({"sonars": []}));
    /// let server = TestServer::start(api.router()).await?;
    ///
    /// server.client.list_sonars().await?;
    /// assert_eq!(api.last_request().unwrap().path, "/api/v1/sonars");
    /// ```
    pub async fn start(router: axum::Router) -> Result<Self> {
        Self::start_with_timeout(router, Duration::from_secs(5)).await
    }

    /// Serve a router; the client gives up on requests after `timeout`
    pub async fn start_with_timeout(router: axum::Router, timeout: Duration) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(RedditInsightsError::transport)?;
        let addr = listener
            .local_addr()
            .map_err(RedditInsightsError::transport)?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = RedditInsightsClient::builder(TEST_API_KEY)
            .base_url(format!("http://{}", addr))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &RedditInsightsClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query() {
        let req = RecordedRequest {
            method: "GET".to_string(),
            path: "/api/v1/sonars".to_string(),
            query: Some("limit=1".to_string()),
            headers: HashMap::from([("authorization".to_string(), "Bearer k".to_string())]),
            body: None,
        };
        assert_eq!(req.path_and_query(), "/api/v1/sonars?limit=1");
        assert_eq!(req.header("Authorization"), Some("Bearer k"));
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let api = MockApi::success(serde_json::json!({}));
        let server = TestServer::start(api.router()).await.unwrap();

        let _: Value = server
            .client
            .execute(crate::ApiRequest::get("/ping"))
            .await
            .unwrap();

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/ping");
        server.shutdown().await;
    }
}
