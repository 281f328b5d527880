//! Per-row email resolution
//!
//! Resolution order for a fetched page:
//! 1. Mailto anchors, in document order; the first valid one wins outright
//! 2. Plain addresses in the visible text
//! 3. `[at]`-obfuscated addresses
//! 4. `(at)`-obfuscated addresses
//!
//! Any failure along the way resolves the row to "not found".

use crate::crawler::fetcher::{FetchError, FetchedPage, PageSource};
use crate::extract::{extract_candidates, EmailValidator};
use crate::state::{CrawlOutcome, OutcomeKind};
use crate::table::RowJob;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MAILTO_ADDRESS: Regex =
        Regex::new(r"(?i)mailto:([^?&\s]+)").expect("mailto pattern compiles");
}

/// Pulls the address part out of a `mailto:` target
///
/// Query parameters (`?subject=...`) are dropped.
pub fn mailto_address(href: &str) -> Option<&str> {
    MAILTO_ADDRESS
        .captures(href)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Picks the contact address for a row
#[derive(Debug, Clone, Default)]
pub struct EmailResolver {
    validator: EmailValidator,
}

impl EmailResolver {
    pub fn new(validator: EmailValidator) -> Self {
        Self { validator }
    }

    /// Chooses the best address on a page, if any
    pub fn resolve_page(&self, page: &FetchedPage) -> Option<String> {
        let from_mailto = page
            .mailto_targets
            .iter()
            .filter_map(|href| mailto_address(href))
            .find_map(|address| self.validator.accept(address));

        if from_mailto.is_some() {
            return from_mailto;
        }

        extract_candidates(&page.text)
            .iter()
            .find_map(|candidate| self.validator.accept(candidate))
    }

    /// Resolves one row, absorbing every failure into the outcome
    pub async fn resolve_row<S>(&self, source: &S, job: &RowJob) -> CrawlOutcome
    where
        S: PageSource + ?Sized,
    {
        let website = job.website.trim();
        if website.is_empty() {
            tracing::debug!("[{}] {} - no website", job.index, job.company);
            return CrawlOutcome::not_found(job.index, OutcomeKind::EmptyWebsite);
        }

        match source.fetch(website).await {
            Ok(page) => match self.resolve_page(&page) {
                Some(address) => {
                    tracing::info!("[{}] {} -> {}", job.index, job.company, address);
                    CrawlOutcome::found(job.index, address)
                }
                None => {
                    tracing::debug!("[{}] {} - no email on {}", job.index, job.company, website);
                    CrawlOutcome::not_found(job.index, OutcomeKind::NoEmailFound)
                }
            },
            Err(FetchError::InvalidUrl(url)) => {
                tracing::warn!("[{}] {} - invalid URL: {}", job.index, job.company, url);
                CrawlOutcome::not_found(job.index, OutcomeKind::InvalidUrl)
            }
            Err(e) => {
                tracing::warn!("[{}] {} - {}", job.index, job.company, e);
                CrawlOutcome::not_found(job.index, OutcomeKind::FetchFailure)
            }
        }
    }
}
