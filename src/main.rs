//! Email Enricher main entry point
//!
//! This is the command-line interface for filling in contact emails in a table
//! of businesses.

use anyhow::Context;
use clap::Parser;
use email_enricher::config::{load_config, validate, Config};
use email_enricher::crawler::{enrich_file, ProgressObserver, TracingObserver};
use email_enricher::output::print_summary;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Email Enricher: finds contact emails for a table of businesses
///
/// Reads a CSV with company, website and email columns, visits each website
/// once and writes a copy of the table with the email column filled in.
/// Rows where nothing was found get the not-found marker.
#[derive(Parser, Debug)]
#[command(name = "email-enricher")]
#[command(version)]
#[command(about = "Fills in contact emails by visiting each company's website", long_about = None)]
struct Cli {
    /// Path to the input table
    #[arg(value_name = "TABLE")]
    input: PathBuf,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the updated table (default: <input>_updated.csv)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of rows resolved at the same time
    #[arg(long)]
    concurrency: Option<u32>,

    /// Pause after each request, per worker (milliseconds)
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Per-request timeout (seconds)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Wall-clock budget for the whole run (seconds)
    #[arg(long, value_name = "SECS")]
    deadline_secs: Option<u64>,

    /// Disable periodic progress reports
    #[arg(long)]
    no_progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    tracing::info!(
        "Workers: {}, delay: {}ms, timeout: {}s, deadline: {}s",
        config.crawler.concurrency,
        config.crawler.request_delay_ms,
        config.fetcher.timeout_secs,
        config.crawler.deadline_secs
    );

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let observer: Option<Arc<dyn ProgressObserver>> = if cli.no_progress {
        None
    } else {
        Some(Arc::new(TracingObserver))
    };

    let summary = enrich_file(
        &config,
        &cli.input,
        cli.output.as_deref(),
        cancel,
        observer,
    )
    .await
    .with_context(|| format!("Failed to enrich {}", cli.input.display()))?;

    print_summary(&summary);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("email_enricher=info,warn"),
            1 => EnvFilter::new("email_enricher=debug,info"),
            2 => EnvFilter::new("email_enricher=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and
/// validates the result
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.request_delay_ms = delay_ms;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.fetcher.timeout_secs = timeout_secs;
    }
    if let Some(deadline_secs) = cli.deadline_secs {
        config.crawler.deadline_secs = deadline_secs;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Cancels `cancel` on the first Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!(
                    "Interrupt received, abandoning in-flight rows and writing partial results"
                );
                cancel.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}
