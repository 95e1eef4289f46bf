//! Request descriptor consumed by [`RedditInsightsClient::execute`]
//!
//! [`RedditInsightsClient::execute`]: crate::RedditInsightsClient::execute

use std::fmt::Display;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{RedditInsightsError, Result};
use crate::types::{
    CreateSonarOptions, CreateSonarRequest, ExecutionsOptions, SemanticSearchRequest,
    TrendsOptions, TrendsRequest, VectorSearchOptions, VectorSearchRequest,
};

const DEFAULT_SEMANTIC_LIMIT: u32 = 20;
const DEFAULT_VECTOR_LIMIT: u32 = 30;
const DEFAULT_TRENDS_LIMIT: u32 = 20;
const DEFAULT_EXECUTIONS_LIMIT: u32 = 50;

/// A single API call: verb, server-relative path, query parameters and body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter. Parameters are sent in insertion order.
    pub fn query(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set the JSON body from any serializable value
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(RedditInsightsError::transport)?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

// =============================================================================
// Endpoint requests
// =============================================================================

impl ApiRequest {
    /// `POST /api/v1/search/semantic`
    pub fn semantic_search(query: &str, limit: Option<u32>) -> Result<Self> {
        let body = SemanticSearchRequest {
            query,
            limit: limit.unwrap_or(DEFAULT_SEMANTIC_LIMIT),
        };
        Self::post("/api/v1/search/semantic").json(&body)
    }

    /// `POST /api/v1/search/vector`
    pub fn vector_search(query: &str, options: &VectorSearchOptions) -> Result<Self> {
        let body = VectorSearchRequest {
            query,
            limit: or_default(options.limit, DEFAULT_VECTOR_LIMIT),
            start_date: non_empty(&options.start_date),
            end_date: non_empty(&options.end_date),
        };
        Self::post("/api/v1/search/vector").json(&body)
    }

    /// `POST /api/v1/trends`
    pub fn trends(options: &TrendsOptions) -> Result<Self> {
        let body = TrendsRequest {
            limit: or_default(options.limit, DEFAULT_TRENDS_LIMIT),
            start_date: non_empty(&options.start_date),
            end_date: non_empty(&options.end_date),
        };
        Self::post("/api/v1/trends").json(&body)
    }

    /// `GET /api/v1/sonars`
    pub fn list_sonars() -> Self {
        Self::get("/api/v1/sonars")
    }

    /// `POST /api/v1/sonars`
    pub fn create_sonar(options: &CreateSonarOptions) -> Result<Self> {
        Self::post("/api/v1/sonars").json(&CreateSonarRequest::from(options))
    }

    /// `GET /api/v1/sonars/{id}/executions?limit=..&offset=..`
    pub fn sonar_executions(sonar_id: &str, options: &ExecutionsOptions) -> Result<Self> {
        let path = format!(
            "/api/v1/sonars/{}/executions",
            encode_path_segment(sonar_id)?
        );
        Ok(Self::get(path)
            .query("limit", or_default(options.limit, DEFAULT_EXECUTIONS_LIMIT))
            .query("offset", options.offset.unwrap_or(0)))
    }

    /// `GET /api/v1/sonars/executions/{id}`
    pub fn execution_detail(execution_id: &str) -> Result<Self> {
        let path = format!(
            "/api/v1/sonars/executions/{}",
            encode_path_segment(execution_id)?
        );
        Ok(Self::get(path))
    }
}

/// Zero counts as "not given"
fn or_default(value: Option<u32>, default: u32) -> u32 {
    value.filter(|v| *v != 0).unwrap_or(default)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Percent-encode an identifier so it forms exactly one path segment.
///
/// `.` and `..` are refused: URL parsing resolves dot segments (encoded or
/// not), which would send the request to a parent resource.
pub(crate) fn encode_path_segment(id: &str) -> Result<String> {
    if id == "." || id == ".." {
        return Err(RedditInsightsError::transport_message(format!(
            "invalid path identifier {:?}",
            id
        )));
    }

    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '\\' => out.push_str("%5C"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_order_preserved() {
        let req = ApiRequest::get("/x").query("limit", 10).query("offset", 5);
        assert_eq!(
            req.query_params(),
            &[
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "5".to_string())
            ]
        );
    }

    #[test]
    fn test_json_body() {
        let req = ApiRequest::post("/x").json(&json!({"a": 1})).unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.body(), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("abc123").unwrap(), "abc123");
        assert_eq!(encode_path_segment("a/b").unwrap(), "a%2Fb");
        assert_eq!(encode_path_segment("a\\b").unwrap(), "a%5Cb");
        assert_eq!(encode_path_segment("a?b#c").unwrap(), "a%3Fb%23c");
        assert_eq!(encode_path_segment("50% off").unwrap(), "50%25%20off");
        assert_eq!(encode_path_segment("v1.2").unwrap(), "v1.2");
        assert_eq!(encode_path_segment("...").unwrap(), "...");
        assert_eq!(encode_path_segment("%2e%2e").unwrap(), "%252e%252e");
    }

    #[test]
    fn test_dot_segments_rejected() {
        for id in [".", ".."] {
            let err = encode_path_segment(id).unwrap_err();
            assert!(matches!(err, RedditInsightsError::Transport { .. }));
            assert!(err.to_string().starts_with("Request failed: invalid path identifier"));
        }
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(None, 30), 30);
        assert_eq!(or_default(Some(0), 30), 30);
        assert_eq!(or_default(Some(7), 30), 7);
    }

    #[test]
    fn test_sonar_executions_request() {
        let req = ApiRequest::sonar_executions("abc", &ExecutionsOptions::default()).unwrap();
        assert_eq!(req.path(), "/api/v1/sonars/abc/executions");
        assert_eq!(
            req.query_params(),
            &[
                ("limit".to_string(), "50".to_string()),
                ("offset".to_string(), "0".to_string())
            ]
        );
    }

    #[test]
    fn test_semantic_search_request_keeps_explicit_limit() {
        let req = ApiRequest::semantic_search("q", Some(0)).unwrap();
        assert_eq!(req.body(), Some(&json!({"query": "q", "limit": 0})));
        let req = ApiRequest::semantic_search("q", None).unwrap();
        assert_eq!(req.body(), Some(&json!({"query": "q", "limit": 20})));
    }
}
