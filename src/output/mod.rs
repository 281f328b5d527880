//! Output module for end-of-run reporting
//!
//! This module handles:
//! - Summarizing a finished batch
//! - Printing the completion banner and totals

pub mod stats;

pub use stats::{print_summary, RunSummary};
