//! Reddit Insights HTTP client implementation

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{RedditInsightsError, Result};
use crate::request::ApiRequest;
use crate::types::*;

/// Production API origin
pub const DEFAULT_BASE_URL: &str = "https://reddit-insights.com";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

const SDK_USER_AGENT: &str = concat!("reddit-insights-rust/", env!("CARGO_PKG_VERSION"));

/// Builder for [`RedditInsightsClient`]
#[derive(Debug)]
pub struct ClientBuilder {
    api_key: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
        }
    }

    /// Override the API origin (e.g. a staging server). One trailing `/` is dropped.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout. A zero duration keeps the 30 s default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Per-request timeout in milliseconds
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    pub fn build(self) -> Result<RedditInsightsClient> {
        let http = Client::builder()
            .build()
            .map_err(RedditInsightsError::transport)?;

        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
        let timeout = self
            .timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(RedditInsightsClient {
            http,
            api_key: self.api_key,
            base_url,
            timeout,
        })
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.strip_suffix('/').unwrap_or(base_url).to_string()
}

/// Reddit Insights REST API client
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RedditInsightsClient {
    http: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for RedditInsightsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditInsightsClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl RedditInsightsClient {
    /// Create a client for the production API with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Effective base URL (without trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full request URL for a descriptor: base + path, then the query string
    /// when any parameters are present.
    pub fn request_url(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path))
            .map_err(RedditInsightsError::transport)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    // =========================================================================
    // Request pipeline
    // =========================================================================

    /// Send a request and decode the response body into `T`.
    ///
    /// Fails with [`RedditInsightsError::Transport`] when no response arrives
    /// within the configured timeout, and with the status-specific variants
    /// when the server answers with a failure status.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let url = self.request_url(&request)?;
        debug!("Sending request to {}", url);

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, SDK_USER_AGENT);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = match tokio::time::timeout(self.timeout, builder.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!("Request failed after {:?}: {}", started.elapsed(), e);
                return Err(RedditInsightsError::transport(e));
            }
            Err(_) => {
                debug!("Request timed out after {:?}", self.timeout);
                return Err(RedditInsightsError::transport_message(format!(
                    "operation timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
        };

        let status = response.status().as_u16();
        debug!("Received HTTP {} in {:?}", status, started.elapsed());

        let value = match response.bytes().await {
            Ok(bytes) => classify_response(status, &bytes)?,
            Err(e) => {
                debug!("Failed to read response body: {}", e);
                return Err(invalid_json(status));
            }
        };

        decode_body(status, value)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// AI-powered semantic search over posts
    #[instrument(skip(self))]
    pub async fn semantic_search(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<SemanticSearchResponse> {
        self.execute(ApiRequest::semantic_search(query, limit)?)
            .await
    }

    /// Embedding similarity search, optionally bounded by date
    #[instrument(skip(self, options))]
    pub async fn vector_search(
        &self,
        query: &str,
        options: &VectorSearchOptions,
    ) -> Result<VectorSearchResponse> {
        self.execute(ApiRequest::vector_search(query, options)?)
            .await
    }

    // =========================================================================
    // Trends
    // =========================================================================

    /// Trending topics for a date window
    #[instrument(skip(self, options))]
    pub async fn get_trends(&self, options: &TrendsOptions) -> Result<TrendsResponse> {
        self.execute(ApiRequest::trends(options)?).await
    }

    // =========================================================================
    // Sonars
    // =========================================================================

    /// List the account's sonars
    #[instrument(skip(self))]
    pub async fn list_sonars(&self) -> Result<Value> {
        self.execute(ApiRequest::list_sonars()).await
    }

    /// Create a sonar
    #[instrument(skip(self, options), fields(name = %options.name))]
    pub async fn create_sonar(&self, options: &CreateSonarOptions) -> Result<Value> {
        self.execute(ApiRequest::create_sonar(options)?).await
    }

    /// Execution history of one sonar, newest first
    #[instrument(skip(self, options))]
    pub async fn get_sonar_executions(
        &self,
        sonar_id: &str,
        options: &ExecutionsOptions,
    ) -> Result<Value> {
        self.execute(ApiRequest::sonar_executions(sonar_id, options)?)
            .await
    }

    /// Full record of one sonar execution
    #[instrument(skip(self))]
    pub async fn get_execution_detail(&self, execution_id: &str) -> Result<Value> {
        self.execute(ApiRequest::execution_detail(execution_id)?)
            .await
    }
}

fn invalid_json(status: u16) -> RedditInsightsError {
    RedditInsightsError::api("Invalid JSON response", status, None)
}

/// Map an HTTP status and raw body to the parsed JSON value or a typed error.
///
/// A body that is not JSON is always an `Api` error, even on success
/// statuses. Status 401, 429 and 400 are matched before the generic `>= 400`
/// branch.
pub fn classify_response(status: u16, body: &[u8]) -> Result<Value> {
    let data: Value = serde_json::from_slice(body).map_err(|_| invalid_json(status))?;

    match status {
        401 => Err(RedditInsightsError::authentication(
            error_message(&data, "Authentication failed"),
            Some(data),
        )),
        429 => Err(RedditInsightsError::rate_limit(
            error_message(&data, "Rate limit exceeded"),
            Some(data),
        )),
        400 => Err(RedditInsightsError::validation(
            error_message(&data, "Validation error"),
            Some(data),
        )),
        s if s >= 400 => Err(RedditInsightsError::api(
            error_message(&data, "API error"),
            s,
            Some(data),
        )),
        _ => Ok(data),
    }
}

/// The envelope's `error` string, or `default` when missing or empty
fn error_message(data: &Value, default: &str) -> String {
    data.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn decode_body<T: DeserializeOwned>(status: u16, value: Value) -> Result<T> {
    T::deserialize(&value).map_err(|e| {
        RedditInsightsError::api(
            format!("Unexpected response body: {}", e),
            status,
            Some(value),
        )
    })
}
