//! Email Enricher: fills in contact emails for a table of businesses
//!
//! This crate reads a delimited table of company/website/email records, visits
//! each website once with a bounded pool of concurrent workers, extracts the
//! most likely contact address and writes an updated copy of the table.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod table;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for run-level failures
///
/// Per-row problems never surface here; they are absorbed by the crawler and
/// recorded as the not-found marker for that row.
#[derive(Debug, Error)]
pub enum EnricherError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("No rows could be read from {}", path.display())]
    EmptyTable { path: PathBuf },

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown encoding label: {0}")]
    InvalidEncoding(String),
}

/// Errors raised while reading or writing tables
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, EnricherError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for table operations
pub type TableResult<T> = std::result::Result<T, TableError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_candidates, EmailValidator};
pub use state::{CrawlOutcome, FoundEmail, OutcomeKind};
pub use table::RowStore;
