//! Per-row outcome definitions
//!
//! A worker produces exactly one `CrawlOutcome` per row it resolves; the
//! coordinator consumes it once when merging results back into the table.

use std::fmt;

/// Why a row ended up with the value it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    // ===== Success =====
    /// A validated address was found on the page
    Found,

    // ===== Normal terminal states =====
    /// The page was fetched but contained no valid address
    NoEmailFound,

    /// The row had no website to visit
    EmptyWebsite,

    // ===== Absorbed failures =====
    /// The website value was not an http(s) URL
    InvalidUrl,

    /// Network, timeout, TLS or HTTP status failure
    FetchFailure,

    /// The run stopped (deadline or interrupt) before the row finished
    Unresolved,
}

impl OutcomeKind {
    /// Returns true if an address was found
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found)
    }

    /// Returns true if resolving the row involved a network request
    ///
    /// Only these rows are followed by the inter-request delay.
    pub fn made_request(&self) -> bool {
        matches!(self, Self::Found | Self::NoEmailFound | Self::FetchFailure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NoEmailFound => "no_email_found",
            Self::EmptyWebsite => "empty_website",
            Self::InvalidUrl => "invalid_url",
            Self::FetchFailure => "fetch_failure",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final value of a row's email column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FoundEmail {
    /// A validated, lower-cased address
    Address(String),
    /// Searched, nothing usable found
    NotFound,
}

impl FoundEmail {
    /// Renders the value written to the table
    pub fn render<'a>(&'a self, not_found_marker: &'a str) -> &'a str {
        match self {
            Self::Address(address) => address.as_str(),
            Self::NotFound => not_found_marker,
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, Self::Address(_))
    }
}

/// Result of resolving one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Position of the row among the data rows
    pub index: usize,
    pub found: FoundEmail,
    pub kind: OutcomeKind,
}

impl CrawlOutcome {
    pub fn found(index: usize, address: String) -> Self {
        Self {
            index,
            found: FoundEmail::Address(address),
            kind: OutcomeKind::Found,
        }
    }

    pub fn not_found(index: usize, kind: OutcomeKind) -> Self {
        Self {
            index,
            found: FoundEmail::NotFound,
            kind,
        }
    }
}
