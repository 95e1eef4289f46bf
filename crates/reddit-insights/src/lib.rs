//! Reddit Insights Client Library
//!
//! Typed async client for the Reddit Insights API: semantic and vector search
//! over Reddit posts, trend aggregation, and scheduled "sonar" monitors.
//!
//! # Example
//!
//! ```rust,no_run
//! use reddit_insights::{RedditInsightsClient, VectorSearchOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RedditInsightsClient::new("ri_your_api_key")?;
//!
//!     let response = client.semantic_search("rust async runtimes", None).await?;
//!     if let Some(data) = response.data {
//!         for post in data.results {
//!             println!("r/{}: {}", post.subreddit, post.title);
//!         }
//!     }
//!
//!     let options = VectorSearchOptions {
//!         start_date: Some("2024-01-01".to_string()),
//!         ..Default::default()
//!     };
//!     let similar = client.vector_search("tokio vs async-std", &options).await?;
//!     println!("{} matches", similar.data.map(|d| d.total).unwrap_or(0.0));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every method returns [`RedditInsightsError`]. HTTP 401, 429 and 400 map to
//! `Authentication`, `RateLimit` and `Validation`; any other failure status to
//! `Api`; and failures without a response (network, timeout) to `Transport`.
//!
//! ```rust,ignore
//! match client.list_sonars().await {
//!     Ok(sonars) => println!("{sonars:#}"),
//!     Err(RedditInsightsError::RateLimit { .. }) => { /* back off */ }
//!     Err(e) => eprintln!("{} (status {:?})", e, e.status_code()),
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module serves a scripted API on a local port:
//!
//! ```rust,ignore
//! use reddit_insights::testing::{MockApi, TestServer};
//!
//! let api = MockApi::respond_json(429, serde_json::json!({"error": "slow down"}));
//! let server = TestServer::start(api.router()).await?;
//! let err = server.client.list_sonars().await.unwrap_err();
//! ```

mod client;
mod error;
mod request;
pub mod testing;
mod types;

pub use client::{
    classify_response, ClientBuilder, RedditInsightsClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
pub use error::{RedditInsightsError, Result};
pub use request::ApiRequest;
pub use types::*;

// Re-export for building custom requests
pub use reqwest::Method;
