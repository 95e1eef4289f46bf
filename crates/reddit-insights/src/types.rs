//! Request and response types for the Reddit Insights API
//!
//! Response types are lenient: every field has a default so that decoding
//! accepts whatever the service sends. Nothing here is validated client-side.
//! Counts are `f64` because the service sends JSON numbers without promising
//! integers, and fields this crate does not model are kept in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Envelope
// =============================================================================

/// Standard response envelope returned by every endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Search Types
// =============================================================================

/// A single post matched by semantic or vector search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub content: String,
    pub subreddit: String,
    pub upvotes: f64,
    pub comments: f64,
    pub created: String,
    pub relevance: Option<f64>,
    pub similarity_score: Option<f64>,
    pub sentiment: Option<String>,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticSearchData {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total: f64,
    pub processing_time_ms: f64,
    pub ai_summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSearchData {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total: f64,
    pub processing_time_ms: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type SemanticSearchResponse = ApiResponse<SemanticSearchData>;
pub type VectorSearchResponse = ApiResponse<VectorSearchData>;

/// Optional parameters for vector search
#[derive(Debug, Clone, Default)]
pub struct VectorSearchOptions {
    /// Maximum results (default 30)
    pub limit: Option<u32>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    pub end_date: Option<String>,
}

// =============================================================================
// Trend Types
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSamplePost {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub upvotes: f64,
    pub comments: f64,
    pub created: String,
}

/// An aggregated cluster of posts sharing a topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendTopic {
    pub id: String,
    pub topic: String,
    pub post_count: f64,
    pub total_upvotes: f64,
    pub total_comments: f64,
    pub avg_sentiment: f64,
    pub top_subreddits: Vec<String>,
    pub trending_keywords: Vec<String>,
    pub sample_posts: Vec<TrendSamplePost>,
    pub trend_score: f64,
    pub growth_rate: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsData {
    pub trends: Vec<TrendTopic>,
    pub total: f64,
    pub date_range: DateRange,
    pub processing_time_ms: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type TrendsResponse = ApiResponse<TrendsData>;

/// Optional parameters for trend retrieval
#[derive(Debug, Clone, Default)]
pub struct TrendsOptions {
    /// Maximum topics (default 20)
    pub limit: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// =============================================================================
// Sonar Types
// =============================================================================

/// A scheduled saved-search monitor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sonar {
    pub id: String,
    pub name: String,
    pub query: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub schedule: String,
    pub last_executed_at: Option<String>,
    pub next_execution_at: Option<String>,
    pub created_at: String,
}

/// One scheduled run of a sonar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SonarExecution {
    pub id: String,
    pub status: String,
    pub executed_at: String,
    pub new_posts_count: f64,
    pub triggered: bool,
    pub trigger_reason: Option<String>,
    pub notification_sent: bool,
    pub ai_summary: Option<String>,
}

/// How often a sonar re-runs its query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SonarSchedule {
    Hourly,
    #[default]
    Daily,
    Weekly,
}

impl std::fmt::Display for SonarSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SonarSchedule::Hourly => write!(f, "hourly"),
            SonarSchedule::Daily => write!(f, "daily"),
            SonarSchedule::Weekly => write!(f, "weekly"),
        }
    }
}

impl std::str::FromStr for SonarSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" => Ok(SonarSchedule::Hourly),
            "daily" => Ok(SonarSchedule::Daily),
            "weekly" => Ok(SonarSchedule::Weekly),
            _ => Err(format!(
                "Invalid schedule '{}'. Valid options: hourly, daily, weekly",
                s
            )),
        }
    }
}

/// Conditions under which a sonar execution notifies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarTriggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_new_posts: Option<u32>,
}

/// Parameters for creating a sonar
///
/// Only `name` and `query` are required; the rest fall back to the service
/// defaults when sent (`daily`, email on, Slack off).
#[derive(Debug, Clone, Default)]
pub struct CreateSonarOptions {
    pub name: String,
    pub query: String,
    pub description: Option<String>,
    pub schedule: Option<SonarSchedule>,
    pub triggers: Option<SonarTriggers>,
    pub notify_email: Option<bool>,
    pub notify_slack: Option<bool>,
    pub slack_webhook: Option<String>,
}

impl CreateSonarOptions {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Paging for sonar execution history
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionsOptions {
    /// Page size (default 50)
    pub limit: Option<u32>,
    /// Records to skip (default 0)
    pub offset: Option<u32>,
}

// =============================================================================
// Wire request bodies
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct SemanticSearchRequest<'a> {
    pub query: &'a str,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct VectorSearchRequest<'a> {
    pub query: &'a str,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrendsRequest<'a> {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSonarRequest<'a> {
    pub name: &'a str,
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub schedule: SonarSchedule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<&'a SonarTriggers>,
    pub notify_email: bool,
    pub notify_slack: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_webhook: Option<&'a str>,
}

impl<'a> From<&'a CreateSonarOptions> for CreateSonarRequest<'a> {
    fn from(opts: &'a CreateSonarOptions) -> Self {
        Self {
            name: &opts.name,
            query: &opts.query,
            description: opts.description.as_deref(),
            schedule: opts.schedule.unwrap_or_default(),
            triggers: opts.triggers.as_ref(),
            notify_email: opts.notify_email.unwrap_or(true),
            notify_slack: opts.notify_slack.unwrap_or(false),
            slack_webhook: opts.slack_webhook.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_sonar_defaults() {
        let opts = CreateSonarOptions::new("n", "q");
        let body = serde_json::to_value(CreateSonarRequest::from(&opts)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "n",
                "query": "q",
                "schedule": "daily",
                "notifyEmail": true,
                "notifySlack": false
            })
        );
    }

    #[test]
    fn test_create_sonar_triggers_camel_case() {
        let opts = CreateSonarOptions {
            triggers: Some(SonarTriggers {
                keywords: Some(vec!["rust".to_string()]),
                sentiment: None,
                min_new_posts: Some(5),
            }),
            schedule: Some(SonarSchedule::Weekly),
            ..CreateSonarOptions::new("n", "q")
        };
        let body = serde_json::to_value(CreateSonarRequest::from(&opts)).unwrap();
        assert_eq!(body["schedule"], "weekly");
        assert_eq!(body["triggers"], json!({"keywords": ["rust"], "minNewPosts": 5}));
    }

    #[test]
    fn test_schedule_parse() {
        assert_eq!("Hourly".parse::<SonarSchedule>().unwrap(), SonarSchedule::Hourly);
        assert!("monthly".parse::<SonarSchedule>().is_err());
        assert_eq!(SonarSchedule::default().to_string(), "daily");
    }

    #[test]
    fn test_envelope_lenient_decode() {
        let resp: SemanticSearchResponse = serde_json::from_value(json!({
            "success": true,
            "data": {
                "query": "rust",
                "results": [{"id": "p1", "title": "Hello", "upvotes": 3}],
                "total": 1
            }
        }))
        .unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data.results[0].id, "p1");
        assert_eq!(data.results[0].subreddit, "");
        assert!(data.ai_summary.is_none());
    }

    #[test]
    fn test_fractional_numbers_accepted() {
        let resp: TrendsResponse = serde_json::from_value(json!({
            "success": true,
            "data": {
                "trends": [{"topic": "t", "post_count": 4, "total_upvotes": 10.5}],
                "total": 1,
                "processing_time_ms": 87.25
            }
        }))
        .unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.processing_time_ms, 87.25);
        assert_eq!(data.trends[0].post_count, 4.0);
        assert_eq!(data.trends[0].total_upvotes, 10.5);
    }

    #[test]
    fn test_unknown_fields_kept() {
        let resp: SemanticSearchResponse = serde_json::from_value(json!({
            "success": true,
            "request_id": "r-1",
            "data": {
                "query": "q",
                "results": [{"id": "p1", "author": "someone"}],
                "extra": "x"
            }
        }))
        .unwrap();
        assert_eq!(resp.extra["request_id"], "r-1");
        let data = resp.data.unwrap();
        assert_eq!(data.extra["extra"], "x");
        assert_eq!(data.results[0].extra["author"], "someone");
        assert!(!data.extra.contains_key("query"));
    }

    #[test]
    fn test_sonar_execution_camel_case() {
        let exec: SonarExecution = serde_json::from_value(json!({
            "id": "e1",
            "status": "completed",
            "newPostsCount": 12,
            "notificationSent": true
        }))
        .unwrap();
        assert_eq!(exec.new_posts_count, 12.0);
        assert!(exec.notification_sent);
        assert!(!exec.triggered);
    }
}
