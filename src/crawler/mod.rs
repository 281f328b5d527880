//! Crawler module for resolving contact emails
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeout and redirect handling
//! - HTML parsing into mailto targets and visible text
//! - Per-row email resolution
//! - Work distribution, request pacing and progress tracking
//! - Overall batch coordination

mod coordinator;
mod fetcher;
mod parser;
mod progress;
mod resolver;
mod scheduler;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{
    build_http_client, is_http_url, FetchError, FetchedPage, HttpFetcher, PageSource,
};
pub use parser::{parse_html, ParsedPage};
pub use progress::{
    format_duration, spawn_reporter, ProgressObserver, ProgressSnapshot, ProgressState,
    TracingObserver,
};
pub use resolver::{mailto_address, EmailResolver};
pub use scheduler::{RequestPacer, WorkQueue};

use crate::config::Config;
use crate::extract::EmailValidator;
use crate::output::RunSummary;
use crate::table::{
    decode_bytes, output_path_for, parse_records, EncodingDetector, HeaderPolicy, RowStore,
    SniffingDetector,
};
use crate::EnricherError;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a complete enrichment over one table file
///
/// This is the main entry point. It will:
/// 1. Check the input exists and detect its encoding
/// 2. Parse the table and locate the company/website/email columns
/// 3. Resolve every row over HTTP
/// 4. Write the updated table
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `input` - Path of the table to enrich
/// * `output` - Where to write the result; defaults to the input name with the
///   configured suffix
/// * `cancel` - Fires on external interrupt; partial results are still written
/// * `observer` - Optional progress observer
///
/// # Returns
///
/// * `Ok(RunSummary)` - The table was written (possibly with partial results)
/// * `Err(EnricherError)` - A pre-flight or write failure
pub async fn enrich_file(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    cancel: CancellationToken,
    observer: Option<Arc<dyn ProgressObserver>>,
) -> Result<RunSummary, EnricherError> {
    let detector = SniffingDetector::new(config.table.fallback_encoding.clone());
    let source = Arc::new(HttpFetcher::from_config(config)?);

    enrich_file_with(config, input, output, &detector, source, cancel, observer).await
}

/// Same as [`enrich_file`] with the encoding detector and page source supplied
pub async fn enrich_file_with<S: PageSource + 'static>(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    detector: &dyn EncodingDetector,
    source: Arc<S>,
    cancel: CancellationToken,
    observer: Option<Arc<dyn ProgressObserver>>,
) -> Result<RunSummary, EnricherError> {
    if !input.is_file() {
        return Err(EnricherError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    let bytes = std::fs::read(input)?;
    let encoding = detector.detect_bytes(&bytes);
    tracing::info!("Reading {} as {}", input.display(), encoding);
    let text = decode_bytes(&bytes, &encoding)?;

    let policy = HeaderPolicy::from_config(&config.table);
    let mut store = RowStore::from_records(parse_records(&text), &policy).ok_or_else(|| {
        EnricherError::EmptyTable {
            path: input.to_path_buf(),
        }
    })?;

    let columns = store.columns();
    tracing::info!(
        "Loaded {} rows (company column: {:?}, website column: {:?}, email column: {:?})",
        store.len(),
        columns.company,
        columns.website,
        columns.email
    );
    if columns.website.is_none() {
        tracing::warn!("No website column found; every row will be marked not found");
    }
    if columns.email.is_none() {
        tracing::warn!("No email column found; the table will be written back unchanged");
    }

    let resolver = EmailResolver::new(EmailValidator::from_config(&config.extractor));
    let mut coordinator = Coordinator::new(config.crawler.clone(), source, resolver);
    if let Some(observer) = observer {
        coordinator = coordinator.with_observer(observer);
    }

    let report = coordinator.run(&mut store, cancel).await;

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => output_path_for(input, &config.table.output_suffix),
    };
    store.write_to(&output_path, &config.table.not_found_marker)?;
    tracing::info!(
        "Wrote {} ({} of {} rows have an email)",
        output_path.display(),
        store.found_count(),
        store.len()
    );

    Ok(RunSummary::from_report(&report, output_path))
}
