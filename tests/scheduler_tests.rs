mod test_harness;

use std::time::Duration;

use spool_lite::config::RunConfig;
use spool_lite::scheduler::{user_names, JobGenerator, JobQueue, JobType};
use spool_lite::worker::{EventKind, EventLog};
use spool_lite::{Runner, SpoolError, SyncMode};
use test_harness::{count_kind, job_ids, queue_of, test_config};

#[test]
fn test_default_startup_generates_fifty_jobs() {
    let config = RunConfig::default();
    let mut queue = JobQueue::new();
    let events = EventLog::new();

    let added = JobGenerator::new(Some(3)).populate(
        &mut queue,
        &user_names(config.generator.users),
        config.generator.jobs_per_user,
        &events,
    );

    assert_eq!(added, 50);
    assert_eq!(queue.len(), 50);
    for user in user_names(5) {
        assert_eq!(queue.jobs_for_user(&user).len(), 10);
    }
}

#[tokio::test]
async fn test_invalid_mode_leaves_queue_untouched() {
    let mut queue = JobQueue::new();
    let events = EventLog::new();
    JobGenerator::new(Some(9)).populate(&mut queue, &user_names(2), 3, &events);
    let before = job_ids(&queue);
    let logged = events.len();
    let config = test_config(2).with_page_duration(Duration::from_millis(1));

    for selection in ["9", "0", "", "fifo"] {
        let result = Runner::select(selection, &config, events.clone());
        assert!(
            matches!(result, Err(SpoolError::Configuration(_))),
            "selection {:?} was accepted",
            selection
        );
    }

    assert_eq!(job_ids(&queue), before);
    assert_eq!(events.len(), logged);
    assert_eq!(count_kind(&events.snapshot(), EventKind::JobStarted), 0);
    assert_eq!(events.page_events(), 0);

    // The same queue still runs once a valid mode is chosen
    let runner = Runner::select("2", &config, events.clone()).unwrap();
    assert_eq!(runner.mode(), SyncMode::MutexPerDevice);
    let report = runner.run_all(&queue).await.unwrap();
    assert_eq!(report.jobs_completed, 6);
    assert!(events.page_events() > 0);
    assert_eq!(job_ids(&queue), before);
}

#[test]
fn test_peterson_rejects_three_contexts() {
    let events = EventLog::new();

    let result = Runner::new(SyncMode::PetersonPrinterOnly, &test_config(3), events.clone());

    assert!(matches!(
        result,
        Err(SpoolError::ContentionViolation { contexts: 3 })
    ));
    assert_eq!(events.page_events(), 0);
}

#[test]
fn test_peterson_defaults_to_two_workers() {
    let config = RunConfig::default();
    let runner = Runner::new(SyncMode::PetersonPrinterOnly, &config, EventLog::new()).unwrap();
    assert_eq!(runner.workers(), 2);
}

#[test]
fn test_other_modes_default_to_one_worker_per_user() {
    let config = RunConfig::default();
    for mode in [
        SyncMode::Unsynchronized,
        SyncMode::MutexPerDevice,
        SyncMode::SemaphoreQueue,
    ] {
        let runner = Runner::new(mode, &config, EventLog::new()).unwrap();
        assert_eq!(runner.workers(), 5);
        assert_eq!(runner.mode(), mode);
    }
}

#[test]
fn test_runner_rejects_zero_workers() {
    let result = Runner::new(SyncMode::MutexPerDevice, &test_config(0), EventLog::new());
    assert!(matches!(result, Err(SpoolError::Configuration(_))));
}

#[tokio::test]
async fn test_run_does_not_drain_job_queue() {
    let queue = queue_of(&[
        ("P1", JobType::Print, 1),
        ("P2", JobType::Scan, 1),
    ]);
    let before = job_ids(&queue);
    let runner = Runner::new(SyncMode::MutexPerDevice, &test_config(2), EventLog::new()).unwrap();

    let report = runner.run_all(&queue).await.unwrap();

    assert_eq!(report.jobs_completed, 2);
    assert_eq!(job_ids(&queue), before);
}

#[tokio::test]
async fn test_empty_queue_runs_nothing() {
    let events = EventLog::new();
    let runner = Runner::new(SyncMode::SemaphoreQueue, &test_config(3), events.clone()).unwrap();

    let report = runner.run_all(&JobQueue::new()).await.unwrap();

    assert_eq!(report.jobs_total, 0);
    assert!(report.results.is_empty());
    assert!(events.is_empty());
}
