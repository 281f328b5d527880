//! Work distribution and request pacing
//!
//! This module handles:
//! - A shared FIFO queue of row jobs, drained by the workers
//! - The per-worker pause between requests

use crate::table::RowJob;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// FIFO queue of rows waiting to be resolved
///
/// Every job is handed out exactly once, in table order.
#[derive(Debug, Default)]
pub struct WorkQueue {
    jobs: Mutex<VecDeque<RowJob>>,
}

impl WorkQueue {
    pub fn new(jobs: Vec<RowJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs.into()),
        }
    }

    /// Takes the next job, or `None` once the queue is drained
    pub fn next(&self) -> Option<RowJob> {
        self.jobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    /// Number of jobs not yet handed out
    pub fn len(&self) -> usize {
        self.jobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pause a worker takes after each request it made
#[derive(Debug, Clone, Copy)]
pub struct RequestPacer {
    delay: Duration,
}

impl RequestPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Sleeps for the configured delay
    ///
    /// Returns false if `cancel` fired first, in which case the worker
    /// should stop taking jobs.
    pub async fn pause(&self, cancel: &CancellationToken) -> bool {
        if self.delay.is_zero() {
            return !cancel.is_cancelled();
        }

        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }
}
