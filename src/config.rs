use std::time::Duration;

use crate::error::{Result, SpoolError};

/// Timing of the simulated devices.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Wall-clock time spent on a single page.
    pub page_duration: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            page_duration: Duration::from_secs(1),
        }
    }
}

/// How many jobs are produced at startup, and for whom.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub users: usize,
    pub jobs_per_user: usize,
    /// Fixed RNG seed for reproducible job sets. Entropy-seeded when `None`.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            users: 5,
            jobs_per_user: 10,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub generator: GeneratorConfig,
    pub executor: ExecutorConfig,
    /// Number of concurrent worker contexts. One per user when `None`.
    pub workers: Option<usize>,
    /// Print every recorded event to stdout as it happens.
    pub echo_events: bool,
}

impl RunConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_page_duration(mut self, page_duration: Duration) -> Self {
        self.executor.page_duration = page_duration;
        self
    }

    pub fn with_users(mut self, users: usize, jobs_per_user: usize) -> Self {
        self.generator.users = users;
        self.generator.jobs_per_user = jobs_per_user;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.generator.users == 0 {
            return Err(SpoolError::Configuration(
                "at least one user is required".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(SpoolError::Configuration(
                "at least one worker is required".to_string(),
            ));
        }
        Ok(())
    }
}
