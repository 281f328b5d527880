//! Progress tracking for a running batch
//!
//! Workers bump the counters in [`ProgressState`] as rows complete. A separate
//! reporter task reads them on a fixed interval and hands snapshots to a
//! [`ProgressObserver`]. Nothing in the crawl depends on whether an observer
//! is attached.

use crate::state::CrawlOutcome;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Shared completion counters
#[derive(Debug)]
pub struct ProgressState {
    total: usize,
    completed: AtomicUsize,
    succeeded: AtomicUsize,
    started: Instant,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Counts one finished row
    pub fn record(&self, success: bool) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed: self.completed(),
            succeeded: self.succeeded(),
            total: self.total,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub succeeded: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.succeeded as f64 * 100.0 / self.completed as f64
        }
    }

    /// Rows completed per minute so far
    pub fn per_minute(&self) -> f64 {
        let minutes = self.elapsed.as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            0.0
        } else {
            self.completed as f64 / minutes
        }
    }

    /// Estimated time remaining at the current average pace
    ///
    /// `None` until at least one row has completed.
    pub fn eta(&self) -> Option<Duration> {
        if self.completed == 0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.completed);
        let per_row = self.elapsed.as_secs_f64() / self.completed as f64;
        Some(Duration::from_secs_f64(per_row * remaining as f64))
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

/// Receives progress while a batch runs
pub trait ProgressObserver: Send + Sync {
    /// Called by the reporter task on every tick
    fn on_progress(&self, snapshot: &ProgressSnapshot);

    /// Called once per finished row, in completion order
    fn on_outcome(&self, _outcome: &CrawlOutcome) {}
}

/// Logs snapshots at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        let eta = snapshot
            .eta()
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string());

        tracing::info!(
            "Progress: {}/{} ({:.1}%), found {} ({:.1}%), elapsed {}, remaining ~{}, {:.1} rows/min",
            snapshot.completed,
            snapshot.total,
            snapshot.percent(),
            snapshot.succeeded,
            snapshot.success_rate(),
            format_duration(snapshot.elapsed),
            eta,
            snapshot.per_minute()
        );
    }
}

/// Formats a duration as `HH:MM:SS`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Spawns the periodic reporter
///
/// The task emits a snapshot every `interval` until `stop` is cancelled, then
/// emits one final snapshot and exits.
pub fn spawn_reporter(
    state: Arc<ProgressState>,
    observer: Arc<dyn ProgressObserver>,
    interval: Duration,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => observer.on_progress(&state.snapshot()),
            }
        }

        observer.on_progress(&state.snapshot());
    })
}
