//! Reddit Insights CLI - command-line access to the Reddit Insights API
//!
//! Search posts, inspect trending topics and manage sonar monitors from the
//! terminal.

mod commands;
mod config;
mod output;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use reddit_insights::{
    CreateSonarOptions, ExecutionsOptions, RedditInsightsClient, RedditInsightsError,
    SonarSchedule, SonarTriggers, TrendsOptions, VectorSearchOptions,
};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{ArgOverrides, Config, MergedConfig};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "reddit-insights")]
#[command(author, version, about = "Reddit Insights API CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// API key
    #[arg(long, env = "REDDIT_INSIGHTS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "REDDIT_INSIGHTS_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Configuration file path
    #[arg(short, long, env = "REDDIT_INSIGHTS_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// AI-powered semantic search over posts
    Search {
        /// Natural-language query
        query: String,

        /// Maximum results
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Embedding similarity search
    VectorSearch {
        /// Query text
        query: String,

        /// Maximum results
        #[arg(long)]
        limit: Option<u32>,

        #[command(flatten)]
        range: DateRangeArgs,
    },

    /// Trending topics
    Trends {
        /// Maximum topics
        #[arg(long)]
        limit: Option<u32>,

        #[command(flatten)]
        range: DateRangeArgs,
    },

    /// Manage sonar monitors
    #[command(subcommand)]
    Sonars(SonarCommands),
}

#[derive(Args)]
struct DateRangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,
}

#[derive(Subcommand)]
enum SonarCommands {
    /// List sonars
    List,

    /// Create a sonar
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Search query to monitor
        #[arg(long)]
        query: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Schedule: hourly, daily, weekly
        #[arg(long)]
        schedule: Option<SonarSchedule>,

        /// Trigger keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Trigger on sentiment (e.g. negative)
        #[arg(long)]
        sentiment: Option<String>,

        /// Trigger when at least this many new posts appear
        #[arg(long)]
        min_new_posts: Option<u32>,

        /// Disable email notifications
        #[arg(long)]
        no_email: bool,

        /// Enable Slack notifications
        #[arg(long)]
        slack: bool,

        /// Slack incoming webhook URL
        #[arg(long)]
        slack_webhook: Option<String>,
    },

    /// Execution history of a sonar
    Executions {
        /// Sonar ID
        sonar_id: String,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,

        /// Records to skip
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show one execution
    Execution {
        /// Execution ID
        execution_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<RedditInsightsError>() {
            Some(sdk_err) => {
                output::report_error(sdk_err);
                std::process::exit(1);
            }
            None => Err(e),
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load config file
    let config = match &cli.config {
        Some(config_path) => Config::load_from(config_path)?,
        None => load_default_config(),
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(ArgOverrides {
        api_key: cli.api_key.as_deref(),
        base_url: cli.base_url.as_deref(),
        timeout_ms: cli.timeout_ms,
        output: cli.output.map(|o| o.as_str()),
        no_color: cli.no_color,
    })?;

    let format: OutputFormat = merged
        .output
        .parse()
        .map_err(|e: String| anyhow!(e))
        .context("Invalid output format in config file")?;
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);
    let client = create_client(&merged)?;
    debug!("Using API at {}", client.base_url());

    match cli.command {
        Commands::Search { query, limit } => {
            commands::semantic_search(&client, &query, limit, &ctx).await?;
        }

        Commands::VectorSearch {
            query,
            limit,
            range,
        } => {
            let options = VectorSearchOptions {
                limit,
                start_date: range.start_date,
                end_date: range.end_date,
            };
            commands::vector_search(&client, &query, &options, &ctx).await?;
        }

        Commands::Trends { limit, range } => {
            let options = TrendsOptions {
                limit,
                start_date: range.start_date,
                end_date: range.end_date,
            };
            commands::trends(&client, &options, &ctx).await?;
        }

        Commands::Sonars(SonarCommands::List) => {
            commands::list_sonars(&client, &ctx).await?;
        }

        Commands::Sonars(SonarCommands::Create {
            name,
            query,
            description,
            schedule,
            keywords,
            sentiment,
            min_new_posts,
            no_email,
            slack,
            slack_webhook,
        }) => {
            let triggers = (!keywords.is_empty() || sentiment.is_some() || min_new_posts.is_some())
                .then(|| SonarTriggers {
                    keywords: (!keywords.is_empty()).then_some(keywords),
                    sentiment,
                    min_new_posts,
                });
            let options = CreateSonarOptions {
                name,
                query,
                description,
                schedule,
                triggers,
                notify_email: Some(!no_email),
                notify_slack: Some(slack || slack_webhook.is_some()),
                slack_webhook,
            };
            commands::create_sonar(&client, &options, &ctx).await?;
        }

        Commands::Sonars(SonarCommands::Executions {
            sonar_id,
            limit,
            offset,
        }) => {
            let options = ExecutionsOptions { limit, offset };
            commands::list_executions(&client, &sonar_id, &options, &ctx).await?;
        }

        Commands::Sonars(SonarCommands::Execution { execution_id }) => {
            commands::execution_detail(&client, &execution_id, &ctx).await?;
        }
    }

    Ok(())
}

/// Load the default config file, falling back to defaults when it is unusable
fn load_default_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        warn!("Skipping default config file: {:#}", e);
        Config::default()
    })
}

/// Create a Reddit Insights client from the merged configuration
fn create_client(config: &MergedConfig) -> Result<RedditInsightsClient> {
    let mut builder = RedditInsightsClient::builder(&config.api_key);
    if let Some(base_url) = &config.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(timeout_ms) = config.timeout_ms {
        builder = builder.timeout_ms(timeout_ms);
    }
    builder.build().context("Failed to create Reddit Insights client")
}
