//! Crawler coordinator - main batch orchestration logic
//!
//! This module runs one batch over a [`RowStore`]:
//! - A fixed pool of worker tasks drains a shared [`WorkQueue`]
//! - Each worker resolves a row, reports the outcome, then paces itself
//! - A single aggregator merges outcomes into the store by row index
//! - A deadline or external cancellation stops new dispatch
//! - Rows left without an outcome are finalized as not found

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageSource;
use crate::crawler::progress::{spawn_reporter, ProgressObserver, ProgressState};
use crate::crawler::resolver::EmailResolver;
use crate::crawler::scheduler::{RequestPacer, WorkQueue};
use crate::state::{CrawlOutcome, OutcomeKind};
use crate::table::RowStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;

/// What happened during one batch
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Data rows in the table
    pub total: usize,

    /// Rows that produced an outcome before shutdown
    pub processed: usize,

    /// Rows resolved to an address
    pub succeeded: usize,

    /// Rows finalized as not found without an outcome; observers see them as
    /// `OutcomeKind::Unresolved`
    pub unresolved: usize,

    pub elapsed: Duration,

    /// The batch deadline expired before the queue drained
    pub deadline_hit: bool,

    /// The caller's cancellation token fired
    pub interrupted: bool,
}

/// Main coordinator structure
pub struct Coordinator<S: PageSource + 'static> {
    config: CrawlerConfig,
    source: Arc<S>,
    resolver: Arc<EmailResolver>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl<S: PageSource + 'static> Coordinator<S> {
    pub fn new(config: CrawlerConfig, source: Arc<S>, resolver: EmailResolver) -> Self {
        Self {
            config,
            source,
            resolver: Arc::new(resolver),
            observer: None,
        }
    }

    /// Attaches a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Resolves every row in `store`
    ///
    /// On return every row has a final value: rows that did not complete
    /// before the deadline or `cancel` are set to not found. Per-row failures
    /// never abort the batch.
    pub async fn run(&self, store: &mut RowStore, cancel: CancellationToken) -> CrawlReport {
        let started = Instant::now();
        let jobs = store.jobs();
        let total = jobs.len();
        let worker_count = (self.config.concurrency.max(1) as usize).min(total);

        tracing::info!(
            "Starting batch: {} rows, {} workers, {:?} between requests",
            total,
            worker_count,
            self.config.request_delay()
        );

        let queue = Arc::new(WorkQueue::new(jobs));
        let progress = Arc::new(ProgressState::new(total));
        let pacer = RequestPacer::new(self.config.request_delay());
        let stop = cancel.child_token();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

        let workers: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    Arc::clone(&queue),
                    Arc::clone(&self.source),
                    Arc::clone(&self.resolver),
                    pacer,
                    stop.clone(),
                    outcome_tx.clone(),
                ))
            })
            .collect();
        drop(outcome_tx);

        let reporter_stop = CancellationToken::new();
        let reporter = self.observer.as_ref().map(|observer| {
            spawn_reporter(
                Arc::clone(&progress),
                Arc::clone(observer),
                self.config.progress_interval(),
                reporter_stop.clone(),
            )
        });

        let deadline = tokio::time::sleep(self.config.deadline());
        tokio::pin!(deadline);
        let mut deadline_hit = false;

        loop {
            tokio::select! {
                received = outcome_rx.recv() => {
                    let Some(outcome) = received else {
                        break;
                    };
                    progress.record(outcome.kind.is_success());
                    if let Some(observer) = &self.observer {
                        observer.on_outcome(&outcome);
                    }
                    if !store.record(outcome.index, outcome.found) {
                        tracing::warn!("Outcome for unknown row {}", outcome.index);
                    }
                }
                _ = &mut deadline, if !deadline_hit => {
                    if queue.is_empty() {
                        tracing::warn!(
                            "Deadline of {:?} reached, abandoning in-flight rows",
                            self.config.deadline()
                        );
                    } else {
                        tracing::warn!(
                            "Deadline of {:?} reached with {} rows still queued",
                            self.config.deadline(),
                            queue.len()
                        );
                    }
                    deadline_hit = true;
                    stop.cancel();
                }
            }
        }

        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        reporter_stop.cancel();
        if let Some(reporter) = reporter {
            if let Err(e) = reporter.await {
                tracing::error!("Progress reporter failed: {}", e);
            }
        }

        let interrupted = cancel.is_cancelled();
        if interrupted {
            tracing::warn!("Batch interrupted, writing partial results");
        }

        let unresolved = store.finalize();
        if let Some(observer) = &self.observer {
            for &index in &unresolved {
                observer.on_outcome(&CrawlOutcome::not_found(index, OutcomeKind::Unresolved));
            }
        }

        let report = CrawlReport {
            total,
            processed: progress.completed(),
            succeeded: progress.succeeded(),
            unresolved: unresolved.len(),
            elapsed: started.elapsed(),
            deadline_hit,
            interrupted,
        };

        tracing::info!(
            "Batch finished: {}/{} processed, {} found, {} unresolved in {:?}",
            report.processed,
            report.total,
            report.succeeded,
            report.unresolved,
            report.elapsed
        );

        report
    }
}

/// One worker: take a row, resolve it, report, pause, repeat
///
/// Each row is resolved in its own task. A panic there becomes a
/// `FetchFailure` outcome; cancellation aborts the task and leaves the row
/// without an outcome.
async fn worker_loop<S: PageSource + 'static>(
    worker_id: usize,
    queue: Arc<WorkQueue>,
    source: Arc<S>,
    resolver: Arc<EmailResolver>,
    pacer: RequestPacer,
    cancel: CancellationToken,
    outcomes: UnboundedSender<CrawlOutcome>,
) {
    while !cancel.is_cancelled() {
        let Some(job) = queue.next() else {
            break;
        };
        let index = job.index;

        let mut task = {
            let source = Arc::clone(&source);
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve_row(source.as_ref(), &job).await })
        };
        let abort = task.abort_handle();

        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                abort.abort();
                tracing::debug!("Worker {} abandoned row {}", worker_id, index);
                break;
            }
            joined = &mut task => match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("[{}] resolution failed unexpectedly: {}", index, e);
                    CrawlOutcome::not_found(index, OutcomeKind::FetchFailure)
                }
            },
        };

        let made_request = outcome.kind.made_request();
        if outcomes.send(outcome).is_err() {
            break;
        }

        if made_request && !pacer.pause(&cancel).await {
            break;
        }
    }

    tracing::debug!("Worker {} finished", worker_id);
}
