//! Configuration module for Email Enricher
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file is
//! the same as loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use email_enricher::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("enricher.toml")).unwrap();
//! println!("Workers: {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractorConfig, FetcherConfig, TableConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
