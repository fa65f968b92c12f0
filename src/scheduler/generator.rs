use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::scheduler::job::{Job, JobType, LengthCategory};
use crate::scheduler::queue::JobQueue;
use crate::worker::events::{EventKind, EventLog};

/// Earliest and latest arrival time, in seconds.
const ARRIVAL_RANGE: (u32, u32) = (1, 5);

/// User identifiers `P1..Pn`.
pub fn user_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("P{}", i)).collect()
}

/// Produces randomized jobs. Needs no device access.
#[derive(Debug)]
pub struct JobGenerator {
    rng: StdRng,
}

impl JobGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn generate(&mut self, user: &str, count: usize) -> Vec<Job> {
        (0..count).map(|_| self.next_job(user)).collect()
    }

    /// Append `jobs_per_user` jobs for every user, announcing each one.
    /// Returns the number of jobs appended.
    pub fn populate(
        &mut self,
        queue: &mut JobQueue,
        users: &[String],
        jobs_per_user: usize,
        events: &EventLog,
    ) -> usize {
        let mut added = 0;
        for user in users {
            for job in self.generate(user, jobs_per_user) {
                events.record(&job, None, EventKind::JobCreated);
                queue.push(job);
                added += 1;
            }
        }
        tracing::info!(users = users.len(), jobs = added, "Jobs generated");
        added
    }

    fn next_job(&mut self, user: &str) -> Job {
        let job_type = if self.rng.gen_bool(0.5) {
            JobType::Print
        } else {
            JobType::Scan
        };
        let category = LengthCategory::ALL[self.rng.gen_range(0..LengthCategory::ALL.len())];
        let (min_pages, max_pages) = category.bounds();
        let length_pages = self.rng.gen_range(min_pages..=max_pages);
        let arrival_time = self.rng.gen_range(ARRIVAL_RANGE.0..=ARRIVAL_RANGE.1);

        // Category bounds already satisfy the page limit checked by `Job::new`.
        Job {
            id: Uuid::new_v4(),
            user: user.to_string(),
            job_type,
            length_pages,
            arrival_time,
            created_at: Utc::now(),
        }
    }
}
