//! Output formatting for reddit-insights (table, json)

use clap::ValueEnum;
use colored::Colorize;
use reddit_insights::RedditInsightsError;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// Pretty-printed JSON, exactly as returned by the API
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        );
    }

    /// Print rows as a table
    pub fn print<T: Tabled>(&self, data: &[T]) {
        if data.is_empty() {
            if !self.quiet {
                println!("No data");
            }
        } else {
            println!("{}", Table::new(data));
        }
    }

    /// Print key-value pairs (for detail views)
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        for (key, value) in pairs {
            println!("{}: {}", key.bold(), value);
        }
    }
}

/// Report an SDK failure on stderr with a hint for the variant
pub fn report_error(err: &RedditInsightsError) {
    let hint = match err {
        RedditInsightsError::Authentication { .. } => {
            Some("Check your API key (--api-key or REDDIT_INSIGHTS_API_KEY)")
        }
        RedditInsightsError::RateLimit { .. } => Some("Rate limited; retry later"),
        RedditInsightsError::Validation { .. } => Some("Check the command arguments"),
        RedditInsightsError::Transport { .. } => {
            Some("Could not reach the API; check --base-url and your network")
        }
        RedditInsightsError::Api { .. } => None,
    };

    let msg = match err.status_code() {
        Some(status) => format!("Error (HTTP {}): {}", status, err),
        None => format!("Error: {}", err),
    };
    eprintln!("{}", msg.red());
    if let Some(hint) = hint {
        eprintln!("{}", hint.yellow());
    }
}

/// Shorten text for a table cell
pub fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Render an optional value, `-` when absent
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Post display for search commands
#[derive(Debug, Tabled)]
pub struct SearchRow {
    #[tabled(rename = "Subreddit")]
    pub subreddit: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Upvotes")]
    pub upvotes: f64,
    #[tabled(rename = "Comments")]
    pub comments: f64,
    #[tabled(rename = "Score")]
    pub score: String,
    #[tabled(rename = "Created")]
    pub created: String,
}

/// Topic display for trends command
#[derive(Debug, Tabled)]
pub struct TrendRow {
    #[tabled(rename = "Topic")]
    pub topic: String,
    #[tabled(rename = "Posts")]
    pub posts: f64,
    #[tabled(rename = "Upvotes")]
    pub upvotes: f64,
    #[tabled(rename = "Sentiment")]
    pub sentiment: String,
    #[tabled(rename = "Growth")]
    pub growth: String,
    #[tabled(rename = "Subreddits")]
    pub subreddits: String,
}

/// Sonar display for sonars list
#[derive(Debug, Tabled)]
pub struct SonarRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Query")]
    pub query: String,
    #[tabled(rename = "Schedule")]
    pub schedule: String,
    #[tabled(rename = "Enabled")]
    pub enabled: String,
    #[tabled(rename = "Next Run")]
    pub next_run: String,
}

/// Execution display for sonar history
#[derive(Debug, Tabled)]
pub struct ExecutionRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Executed")]
    pub executed_at: String,
    #[tabled(rename = "New Posts")]
    pub new_posts: f64,
    #[tabled(rename = "Triggered")]
    pub triggered: String,
    #[tabled(rename = "Notified")]
    pub notified: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
        assert_eq!(truncate("line\nbreak", 20), "line break");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash::<String>(None), "-");
        assert_eq!(or_dash(Some(0.5)), "0.5");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().as_str(), "table");
    }
}
