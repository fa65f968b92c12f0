use std::collections::VecDeque;
use std::sync::Mutex;

use crate::scheduler::job::Job;

/// Jobs in the order they were produced.
///
/// Producers only append; a run reads a snapshot through [`JobQueue::dispatch`]
/// and leaves the queue itself untouched.
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    jobs: Vec<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Jobs submitted by a single user, in insertion order
    pub fn jobs_for_user(&self, user: &str) -> Vec<&Job> {
        self.jobs.iter().filter(|j| j.user == user).collect()
    }

    /// Snapshot the queue into a FIFO that concurrent workers can drain.
    pub fn dispatch(&self) -> DispatchQueue {
        DispatchQueue {
            pending: Mutex::new(self.jobs.iter().cloned().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// FIFO handed out to worker contexts for one run.
///
/// `take_next` is atomic: each job is delivered to exactly one caller.
#[derive(Debug)]
pub struct DispatchQueue {
    pending: Mutex<VecDeque<Job>>,
}

impl DispatchQueue {
    pub fn take_next(&self) -> Option<Job> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
