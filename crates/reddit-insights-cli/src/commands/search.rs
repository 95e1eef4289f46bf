//! Search commands - semantic and vector search

use anyhow::Result;
use reddit_insights::{ApiRequest, RedditInsightsClient, SearchResult, VectorSearchOptions};
use serde_json::Value;

use crate::output::{or_dash, truncate, OutputContext, SearchRow};

/// AI-powered semantic search
pub async fn semantic_search(
    client: &RedditInsightsClient,
    query: &str,
    limit: Option<u32>,
    ctx: &OutputContext,
) -> Result<()> {
    if ctx.is_json() {
        let raw: Value = client
            .execute(ApiRequest::semantic_search(query, limit)?)
            .await?;
        ctx.print_json(&raw);
        return Ok(());
    }

    let response = client.semantic_search(query, limit).await?;

    let Some(data) = response.data else {
        ctx.info("No results");
        return Ok(());
    };

    if let Some(summary) = &data.ai_summary {
        ctx.info(&format!("Summary: {}\n", summary));
    }
    ctx.print(&rows(&data.results));
    ctx.info(&format!(
        "{} result(s) in {} ms",
        data.total, data.processing_time_ms
    ));
    Ok(())
}

/// Embedding similarity search
pub async fn vector_search(
    client: &RedditInsightsClient,
    query: &str,
    options: &VectorSearchOptions,
    ctx: &OutputContext,
) -> Result<()> {
    if ctx.is_json() {
        let raw: Value = client
            .execute(ApiRequest::vector_search(query, options)?)
            .await?;
        ctx.print_json(&raw);
        return Ok(());
    }

    let response = client.vector_search(query, options).await?;

    let Some(data) = response.data else {
        ctx.info("No results");
        return Ok(());
    };

    ctx.print(&rows(&data.results));
    ctx.info(&format!(
        "{} result(s) in {} ms",
        data.total, data.processing_time_ms
    ));
    Ok(())
}

fn rows(results: &[SearchResult]) -> Vec<SearchRow> {
    results
        .iter()
        .map(|r| SearchRow {
            subreddit: format!("r/{}", r.subreddit),
            title: truncate(&r.title, 60),
            upvotes: r.upvotes,
            comments: r.comments,
            score: or_dash(
                r.relevance
                    .or(r.similarity_score)
                    .map(|s| format!("{:.2}", s)),
            ),
            created: r.created.clone(),
        })
        .collect()
}
