use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::RunConfig;
use crate::error::{Result, SpoolError};
use crate::scheduler::{DispatchQueue, JobQueue, JobStatus};
use crate::sync::{Strategy, SyncMode};
use crate::worker::{DeviceExecutor, EventLog, ExecutionResult, OccupancyStats};

/// Summary of one run over the job queue.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: SyncMode,
    pub workers: usize,
    pub jobs_total: usize,
    pub jobs_completed: usize,
    pub jobs_cancelled: usize,
    pub pages_processed: u64,
    #[serde(flatten)]
    pub occupancy: OccupancyStats,
    pub elapsed_ms: u64,
    pub results: Vec<ExecutionResult>,
}

/// Drives a job queue through one synchronization strategy.
///
/// Every worker context is its own tokio task pulling from a shared FIFO, so
/// jobs really do run concurrently and the strategy is what keeps devices
/// exclusive.
pub struct Runner {
    strategy: Arc<Strategy>,
    executor: DeviceExecutor,
    workers: usize,
    shutdown: CancellationToken,
}

impl Runner {
    /// Set up a run. Fails before any job executes if the configuration is
    /// invalid or the mode cannot arbitrate the requested worker count.
    pub fn new(mode: SyncMode, config: &RunConfig, events: EventLog) -> Result<Self> {
        config.validate()?;
        let workers = Self::resolve_workers(mode, config);
        let strategy = Strategy::new(mode, workers)?;

        Ok(Self {
            strategy: Arc::new(strategy),
            executor: DeviceExecutor::new(config.executor.clone(), events),
            workers,
            shutdown: CancellationToken::new(),
        })
    }

    /// Set up a run from an operator's mode selection (`"1"`..`"4"` or a
    /// mode name). An unknown selection fails with `Configuration` and
    /// nothing is executed.
    pub fn select(selection: &str, config: &RunConfig, events: EventLog) -> Result<Self> {
        let mode: SyncMode = selection.parse()?;
        Self::new(mode, config, events)
    }

    /// Stop taking new jobs, and interrupt running ones at the next page
    /// boundary, once `shutdown` is cancelled.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.executor = self.executor.with_shutdown(shutdown.clone());
        self.shutdown = shutdown;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn mode(&self) -> SyncMode {
        self.strategy.mode()
    }

    fn resolve_workers(mode: SyncMode, config: &RunConfig) -> usize {
        match (config.workers, mode.max_contexts()) {
            (Some(workers), _) => workers,
            (None, Some(max)) if config.generator.users > max => {
                tracing::warn!(
                    mode = %mode,
                    users = config.generator.users,
                    workers = max,
                    "Mode supports a bounded number of contending contexts, using fewer workers than users"
                );
                max
            }
            (None, _) => config.generator.users,
        }
    }

    /// Consume a snapshot of `queue`, leaving the queue itself untouched.
    pub async fn run_all(&self, queue: &JobQueue) -> Result<RunReport> {
        let started = Instant::now();
        let dispatch = Arc::new(queue.dispatch());

        tracing::info!(
            mode = %self.mode(),
            workers = self.workers,
            jobs = queue.len(),
            "Starting run"
        );

        // Cancelled on external shutdown, or when any worker fails
        let run_token = self.shutdown.child_token();
        let executor = self.executor.clone().with_shutdown(run_token.clone());

        let mut workers = JoinSet::new();
        for worker in 0..self.workers {
            let strategy = self.strategy.clone();
            let dispatch = dispatch.clone();
            let executor = executor.clone();
            let shutdown = run_token.clone();
            workers.spawn(async move {
                Self::worker_loop(worker, strategy, dispatch, executor, shutdown).await
            });
        }

        // Every worker is joined before returning, even after a failure
        let mut results = Vec::with_capacity(queue.len());
        let mut failure: Option<SpoolError> = None;
        while let Some(joined) = workers.join_next().await {
            let error = match joined {
                Ok(Ok(executed)) => {
                    results.extend(executed);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(e) => SpoolError::from(e),
            };
            tracing::warn!(error = %error, "Worker failed, stopping run");
            run_token.cancel();
            failure.get_or_insert(error);
        }
        if let Some(error) = failure {
            return Err(error);
        }
        results.sort_by_key(|r| r.started_at);

        let jobs_completed = results
            .iter()
            .filter(|r| r.status == JobStatus::Completed)
            .count();
        let report = RunReport {
            mode: self.mode(),
            workers: self.workers,
            jobs_total: queue.len(),
            jobs_completed,
            jobs_cancelled: results.len() - jobs_completed,
            pages_processed: results.iter().map(|r| u64::from(r.pages_done)).sum(),
            occupancy: self.executor.occupancy(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            results,
        };

        tracing::info!(
            mode = %report.mode,
            completed = report.jobs_completed,
            cancelled = report.jobs_cancelled,
            conflicts = report.occupancy.device_conflicts,
            elapsed_ms = report.elapsed_ms,
            "Run finished"
        );
        Ok(report)
    }

    /// One execution context: keeps taking jobs until the queue is drained
    /// or shutdown is requested.
    async fn worker_loop(
        worker: usize,
        strategy: Arc<Strategy>,
        dispatch: Arc<DispatchQueue>,
        executor: DeviceExecutor,
        shutdown: CancellationToken,
    ) -> Result<Vec<ExecutionResult>> {
        let mut results = Vec::new();

        while !shutdown.is_cancelled() {
            match strategy.process_next(worker, &dispatch, &executor).await? {
                Some(result) => results.push(result),
                None => break,
            }
        }

        tracing::debug!(
            worker,
            executed = results.len(),
            remaining = dispatch.remaining(),
            "Worker finished"
        );
        Ok(results)
    }
}
