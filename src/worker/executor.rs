use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::ExecutorConfig;
use crate::scheduler::{Job, JobStatus, JobType};
use crate::worker::events::{EventKind, EventLog};
use crate::worker::occupancy::{Occupancy, OccupancyStats};

/// Result of job execution
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub job_id: Uuid,
    pub user: String,
    pub job_type: JobType,
    pub worker: usize,
    pub status: JobStatus,
    pub pages_done: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Simulates a device working through a job page by page.
///
/// The executor does no locking of its own: callers must already hold
/// whatever permit the active strategy requires. A page is the atomic unit of
/// work, so cancellation is only observed between pages.
#[derive(Debug, Clone)]
pub struct DeviceExecutor {
    config: ExecutorConfig,
    events: EventLog,
    occupancy: Arc<Occupancy>,
    shutdown: CancellationToken,
}

impl DeviceExecutor {
    pub fn new(config: ExecutorConfig, events: EventLog) -> Self {
        Self {
            config,
            events,
            occupancy: Arc::new(Occupancy::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn occupancy(&self) -> OccupancyStats {
        self.occupancy.stats()
    }

    /// Run one job on its device from the given worker context
    pub async fn execute(&self, worker: usize, job: &Job) -> ExecutionResult {
        let _slot = self.occupancy.enter(job.job_type);
        let started_at = Utc::now();
        self.events.record(job, Some(worker), EventKind::JobStarted);
        tracing::info!(
            job_id = %job.id,
            user = %job.user,
            device = job.job_type.device(),
            pages = job.length_pages,
            worker,
            "Executing job"
        );

        let total = job.length_pages;
        let mut pages_done = 0;
        while pages_done < total {
            if self.shutdown.is_cancelled() {
                self.events.record(
                    job,
                    Some(worker),
                    EventKind::JobCancelled { pages_done, total },
                );
                tracing::info!(job_id = %job.id, pages_done, total, "Job cancelled");
                return self.result(worker, job, JobStatus::Cancelled, pages_done, started_at);
            }

            let page = pages_done + 1;
            self.events
                .record(job, Some(worker), EventKind::PageProgress { page, total });
            tracing::debug!(job_id = %job.id, page, total, "Page in progress");
            tokio::time::sleep(self.config.page_duration).await;
            pages_done = page;
        }

        self.events.record(job, Some(worker), EventKind::JobCompleted);
        tracing::info!(job_id = %job.id, user = %job.user, worker, "Job completed");
        self.result(worker, job, JobStatus::Completed, pages_done, started_at)
    }

    fn result(
        &self,
        worker: usize,
        job: &Job,
        status: JobStatus,
        pages_done: u32,
        started_at: DateTime<Utc>,
    ) -> ExecutionResult {
        ExecutionResult {
            job_id: job.id,
            user: job.user.clone(),
            job_type: job.job_type,
            worker,
            status,
            pages_done,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
