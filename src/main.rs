use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flexitrackr::app::{build_report, range_output, transaction_output, weeks_output};
use flexitrackr::clock::Clock;
use flexitrackr::config::{default_config_path, Config, ACCESS_TOKEN_ENV};
use flexitrackr::sync::{TransactionFeed, TransactionFetcher};

#[derive(Parser)]
#[command(name = "flexitrackr")]
#[command(about = "Weekly budget view over recent card transactions")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show current configuration
    Config,
    /// Show the financial month containing a date (default: today)
    Range {
        /// Reference date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// List the week markers shown right now, most recent first
    Weeks,
    /// Fetch recent transactions from the backend
    Fetch,
    /// Fetch, categorize and group transactions by week
    Report {
        /// Category bucket key to list by week (default: first bucket)
        #[arg(long)]
        category: Option<String>,
    },
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ConfigOutput {
    config_file: String,
    base_url: String,
    access_token_set: bool,
    lookback_days: u32,
    timezone: String,
    prefer_merchant_name: bool,
    buckets: Vec<String>,
}

async fn refresh_feed(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> Result<TransactionFeed<TransactionFetcher>> {
    let access_token = config.resolve_access_token(std::env::var(ACCESS_TOKEN_ENV).ok())?;
    let mut feed = TransactionFeed::new(config.fetcher(clock));
    feed.refresh(access_token.expose_secret(), || {
        tracing::debug!("Transaction refresh complete");
    })
    .await?;
    Ok(feed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    let clock: Arc<dyn Clock> = Arc::new(config.clock()?);
    let calendar = config.calendar();

    match cli.command {
        Command::Config => print_json(&ConfigOutput {
            config_file: config_path.display().to_string(),
            base_url: config.base_url.clone(),
            access_token_set: config
                .has_access_token(std::env::var(ACCESS_TOKEN_ENV).ok().as_deref()),
            lookback_days: config.lookback_days,
            timezone: config
                .timezone
                .clone()
                .unwrap_or_else(|| "local".to_string()),
            prefer_merchant_name: config.prefer_merchant_name,
            buckets: config.buckets.keys().map(str::to_string).collect(),
        }),
        Command::Range { date } => {
            let reference = match date {
                Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date: {raw}"))?,
                None => clock.today(),
            };
            print_json(&range_output(&calendar, reference))
        }
        Command::Weeks => print_json(&weeks_output(&calendar, clock.now())),
        Command::Fetch => {
            let feed = refresh_feed(&config, clock.clone()).await?;
            let today = clock.today();
            let output: Vec<_> = feed
                .transactions()
                .iter()
                .map(|tx| transaction_output(tx, today, &config.display))
                .collect();
            print_json(&output)
        }
        Command::Report { category } => {
            let feed = refresh_feed(&config, clock.clone()).await?;
            print_json(&build_report(
                feed.transactions(),
                &config.buckets,
                &calendar,
                &config.display,
                clock.now(),
                category.as_deref(),
            )?)
        }
    }
}
