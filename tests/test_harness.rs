//! Shared helpers for run-level tests.
//!
//! Builds small fixed job queues, fast run configurations, and checks over
//! the recorded event stream.

#![allow(dead_code)]

use std::time::Duration;

use spool_lite::config::RunConfig;
use spool_lite::scheduler::{Job, JobQueue, JobType};
use spool_lite::worker::{Event, EventKind, EventLog};
use uuid::Uuid;

/// Page time short enough for tests but long enough for jobs to overlap.
pub const TEST_PAGE: Duration = Duration::from_millis(20);

/// Run configuration with fast pages and an explicit worker count
pub fn test_config(workers: usize) -> RunConfig {
    RunConfig::default()
        .with_workers(workers)
        .with_page_duration(TEST_PAGE)
}

/// Queue holding exactly the given `(user, type, pages)` jobs, in order
pub fn queue_of(jobs: &[(&str, JobType, u32)]) -> JobQueue {
    let mut queue = JobQueue::new();
    for &(user, job_type, pages) in jobs {
        queue.push(Job::new(user, job_type, pages, 1).unwrap());
    }
    queue
}

pub fn job_ids(queue: &JobQueue) -> Vec<Uuid> {
    queue.iter().map(|j| j.id).collect()
}

/// Page numbers reported for a job, in recording order
pub fn page_sequence(events: &[Event], job_id: Uuid) -> Vec<u32> {
    events
        .iter()
        .filter(|e| e.job_id == job_id)
        .filter_map(|e| match e.kind {
            EventKind::PageProgress { page, .. } => Some(page),
            _ => None,
        })
        .collect()
}

pub fn count_kind(events: &[Event], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}

/// Assert the executor contract for one job: start, pages `1..=n` in order,
/// then exactly one completion and nothing after it.
pub fn assert_execution_contract(log: &EventLog, job: &Job) {
    let events = log.for_job(job.id);
    let kinds: Vec<EventKind> = events
        .iter()
        .filter(|e| e.kind != EventKind::JobCreated)
        .map(|e| e.kind)
        .collect();

    let mut expected = vec![EventKind::JobStarted];
    expected.extend((1..=job.length_pages).map(|page| EventKind::PageProgress {
        page,
        total: job.length_pages,
    }));
    expected.push(EventKind::JobCompleted);

    assert_eq!(kinds, expected, "unexpected event stream for {}", job);
    assert!(events.iter().all(|e| e.user == job.user));
}

/// Range of log positions from a job's start to its completion
pub fn execution_span(events: &[Event], job_id: Uuid) -> (u64, u64) {
    let start = events
        .iter()
        .find(|e| e.job_id == job_id && e.kind == EventKind::JobStarted)
        .map(|e| e.seq)
        .expect("job never started");
    let end = events
        .iter()
        .find(|e| e.job_id == job_id && e.kind == EventKind::JobCompleted)
        .map(|e| e.seq)
        .expect("job never completed");
    (start, end)
}

/// True if the two jobs' executions overlap in the event log
pub fn spans_overlap(events: &[Event], a: Uuid, b: Uuid) -> bool {
    let (a_start, a_end) = execution_span(events, a);
    let (b_start, b_end) = execution_span(events, b);
    a_start < b_end && b_start < a_end
}
