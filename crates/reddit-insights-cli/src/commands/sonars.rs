//! Sonar commands - saved-search monitors

use anyhow::Result;
use reddit_insights::{
    CreateSonarOptions, ExecutionsOptions, RedditInsightsClient, Sonar, SonarExecution,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::output::{or_dash, truncate, ExecutionRow, OutputContext, SonarRow};

/// List all sonars
pub async fn list_sonars(client: &RedditInsightsClient, ctx: &OutputContext) -> Result<()> {
    let response = client.list_sonars().await?;

    if ctx.is_json() {
        ctx.print_json(&response);
        return Ok(());
    }

    let sonars: Vec<Sonar> = items(&response, "sonars");
    let rows: Vec<SonarRow> = sonars
        .into_iter()
        .map(|s| SonarRow {
            id: s.id,
            name: s.name,
            query: truncate(&s.query, 40),
            schedule: s.schedule,
            enabled: if s.enabled { "Yes" } else { "No" }.to_string(),
            next_run: or_dash(s.next_execution_at),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

/// Create a sonar
pub async fn create_sonar(
    client: &RedditInsightsClient,
    options: &CreateSonarOptions,
    ctx: &OutputContext,
) -> Result<()> {
    let response = client.create_sonar(options).await?;

    if ctx.is_json() {
        ctx.print_json(&response);
        return Ok(());
    }

    let id = response
        .pointer("/data/id")
        .or_else(|| response.pointer("/data/sonar/id"))
        .and_then(Value::as_str)
        .unwrap_or("-");
    ctx.success(&format!("Created sonar '{}' ({})", options.name, id));
    Ok(())
}

/// Execution history of a sonar
pub async fn list_executions(
    client: &RedditInsightsClient,
    sonar_id: &str,
    options: &ExecutionsOptions,
    ctx: &OutputContext,
) -> Result<()> {
    let response = client.get_sonar_executions(sonar_id, options).await?;

    if ctx.is_json() {
        ctx.print_json(&response);
        return Ok(());
    }

    let executions: Vec<SonarExecution> = items(&response, "executions");
    let rows: Vec<ExecutionRow> = executions.into_iter().map(execution_row).collect();

    ctx.print(&rows);
    Ok(())
}

/// Full record of one execution
pub async fn execution_detail(
    client: &RedditInsightsClient,
    execution_id: &str,
    ctx: &OutputContext,
) -> Result<()> {
    let response = client.get_execution_detail(execution_id).await?;

    if ctx.is_json() {
        ctx.print_json(&response);
        return Ok(());
    }

    let data = response.get("data").cloned().unwrap_or(Value::Null);
    let record = data.get("execution").cloned().unwrap_or(data);
    let Ok(exec) = serde_json::from_value::<SonarExecution>(record) else {
        ctx.print_json(&response);
        return Ok(());
    };

    ctx.print_kv(&[
        ("ID", exec.id),
        ("Status", exec.status),
        ("Executed", exec.executed_at),
        ("New posts", exec.new_posts_count.to_string()),
        ("Triggered", exec.triggered.to_string()),
        ("Trigger reason", or_dash(exec.trigger_reason)),
        ("Notification sent", exec.notification_sent.to_string()),
        ("Summary", or_dash(exec.ai_summary)),
    ]);
    Ok(())
}

fn execution_row(e: SonarExecution) -> ExecutionRow {
    ExecutionRow {
        id: e.id,
        status: e.status,
        executed_at: e.executed_at,
        new_posts: e.new_posts_count,
        triggered: if e.triggered { "Yes" } else { "No" }.to_string(),
        notified: if e.notification_sent { "Yes" } else { "No" }.to_string(),
    }
}

/// Decode the list under `data`, accepting either a bare array or an object
/// holding the array under `key`. Entries that do not decode are skipped.
fn items<T: DeserializeOwned>(response: &Value, key: &str) -> Vec<T> {
    let data = response.get("data");
    let list = match data {
        Some(Value::Array(list)) => Some(list),
        Some(obj) => obj.get(key).and_then(Value::as_array),
        None => None,
    };

    list.map(|list| {
        list.iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    })
    .unwrap_or_default()
}
