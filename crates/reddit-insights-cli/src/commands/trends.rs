//! Trends command - trending topics

use anyhow::Result;
use reddit_insights::{ApiRequest, RedditInsightsClient, TrendsOptions};
use serde_json::Value;

use crate::output::{OutputContext, TrendRow};

/// Show trending topics for a date window
pub async fn trends(
    client: &RedditInsightsClient,
    options: &TrendsOptions,
    ctx: &OutputContext,
) -> Result<()> {
    if ctx.is_json() {
        let raw: Value = client.execute(ApiRequest::trends(options)?).await?;
        ctx.print_json(&raw);
        return Ok(());
    }

    let response = client.get_trends(options).await?;

    let Some(data) = response.data else {
        ctx.info("No trends");
        return Ok(());
    };

    let rows: Vec<TrendRow> = data
        .trends
        .into_iter()
        .map(|t| TrendRow {
            topic: t.topic,
            posts: t.post_count,
            upvotes: t.total_upvotes,
            sentiment: format!("{:+.2}", t.avg_sentiment),
            growth: format!("{:+.0}%", t.growth_rate * 100.0),
            subreddits: t
                .top_subreddits
                .iter()
                .take(3)
                .map(|s| format!("r/{}", s))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    ctx.print(&rows);
    ctx.info(&format!(
        "{} topic(s), {} to {}",
        data.total, data.date_range.start, data.date_range.end
    ));
    Ok(())
}
