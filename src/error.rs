use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpoolError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Peterson's algorithm supports at most two contending contexts, {contexts} configured"
    )]
    ContentionViolation { contexts: usize },

    #[error("Invalid job: {0}")]
    InvalidJob(String),

    #[error("Worker task failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SpoolError>;
