use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::scheduler::{Job, JobType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    JobCreated,
    JobStarted,
    PageProgress { page: u32, total: u32 },
    JobCompleted,
    JobCancelled { pages_done: u32, total: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Position in the log; totally ordered across all workers.
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub worker: Option<usize>,
    pub job_id: Uuid,
    pub user: String,
    pub job_type: JobType,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            EventKind::JobCreated => write!(f, "{}: {} Job created.", self.user, self.job_type),
            EventKind::JobStarted => match self.worker {
                Some(worker) => write!(
                    f,
                    "{} - {} Job started on worker-{}.",
                    self.user, self.job_type, worker
                ),
                None => write!(f, "{} - {} Job started.", self.user, self.job_type),
            },
            EventKind::PageProgress { page, total } => write!(
                f,
                "{} - {} Job: Page {}/{} in progress...",
                self.user, self.job_type, page, total
            ),
            EventKind::JobCompleted => write!(f, "{} - {} Job complete.", self.user, self.job_type),
            EventKind::JobCancelled { pages_done, total } => write!(
                f,
                "{} - {} Job cancelled after {}/{} pages.",
                self.user, self.job_type, pages_done, total
            ),
        }
    }
}

/// Append-only log shared by every execution context of a run.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<Vec<Event>>>,
    echo: bool,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that also prints each event to stdout as it is recorded.
    pub fn echoing() -> Self {
        Self {
            inner: Arc::default(),
            echo: true,
        }
    }

    pub fn record(&self, job: &Job, worker: Option<usize>, kind: EventKind) {
        let mut events = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let event = Event {
            seq: events.len() as u64,
            at: Utc::now(),
            worker,
            job_id: job.id,
            user: job.user.clone(),
            job_type: job.job_type,
            kind,
        };
        if self.echo {
            match event.kind {
                // Creation lines carry the full job description
                EventKind::JobCreated => println!("{}", job),
                _ => println!("{}", event),
            }
        }
        events.push(event);
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events of a single job, in recording order.
    pub fn for_job(&self, job_id: Uuid) -> Vec<Event> {
        self.snapshot()
            .into_iter()
            .filter(|e| e.job_id == job_id)
            .collect()
    }

    pub fn page_events(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|e| matches!(e.kind, EventKind::PageProgress { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
