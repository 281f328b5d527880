//! Run summary
//!
//! This module turns a finished batch into the totals shown to the operator.

use crate::crawler::{format_duration, CrawlReport};
use std::path::PathBuf;
use std::time::Duration;

/// Totals for one finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Data rows in the input table
    pub total: usize,

    /// Rows that were resolved before shutdown
    pub processed: usize,

    /// Rows that ended with an email address
    pub succeeded: usize,

    /// Rows written as not found without being resolved
    pub unresolved: usize,

    /// Wall-clock time of the crawl
    pub elapsed: Duration,

    /// Where the updated table was written
    pub output_path: PathBuf,

    pub deadline_hit: bool,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn from_report(report: &CrawlReport, output_path: PathBuf) -> Self {
        Self {
            total: report.total,
            processed: report.processed,
            succeeded: report.succeeded,
            unresolved: report.unresolved,
            elapsed: report.elapsed,
            output_path,
            deadline_hit: report.deadline_hit,
            interrupted: report.interrupted,
        }
    }

    /// Percentage of processed rows that found an address
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.processed as f64) * 100.0
        }
    }

    /// Average wall-clock seconds per input row
    pub fn average_secs_per_row(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.elapsed.as_secs_f64() / self.total as f64
        }
    }

    /// True if every row was resolved
    pub fn is_complete(&self) -> bool {
        !self.deadline_hit && !self.interrupted && self.unresolved == 0
    }
}

/// Prints the completion banner and totals to stdout
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    println!();
    if summary.is_complete() {
        println!("=== Enrichment Complete ===\n");
    } else if summary.interrupted {
        println!("=== Enrichment Interrupted (partial results saved) ===\n");
    } else {
        println!("=== Enrichment Stopped at Deadline (partial results saved) ===\n");
    }

    println!("  Rows in table:     {}", summary.total);
    println!("  Rows processed:    {}", summary.processed);
    println!("  Emails found:      {}", summary.succeeded);
    if summary.unresolved > 0 {
        println!("  Not reached:       {}", summary.unresolved);
    }
    println!("  Success rate:      {:.1}%", summary.success_rate());
    println!("  Elapsed:           {}", format_duration(summary.elapsed));
    println!(
        "  Average per row:   {:.2}s",
        summary.average_secs_per_row()
    );
    println!();
    println!("Output written to: {}", summary.output_path.display());
}
