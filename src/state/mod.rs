//! State module for per-row crawl results
//!
//! # Components
//!
//! - `OutcomeKind`: Why a row ended up with its final value
//! - `FoundEmail`: The final value of a row's email column
//! - `CrawlOutcome`: One worker's result for one row

mod outcome;

// Re-export main types
pub use outcome::{CrawlOutcome, FoundEmail, OutcomeKind};
