use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SpoolError};

/// Longest job the devices accept.
pub const MAX_PAGES: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    Print,
    Scan,
}

impl JobType {
    /// Name of the device this kind of job occupies.
    pub fn device(&self) -> &'static str {
        match self {
            JobType::Print => "printer",
            JobType::Scan => "scanner",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::Print => write!(f, "Print"),
            JobType::Scan => write!(f, "Scan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthCategory {
    Short,
    Medium,
    Large,
}

impl LengthCategory {
    pub const ALL: [LengthCategory; 3] = [
        LengthCategory::Short,
        LengthCategory::Medium,
        LengthCategory::Large,
    ];

    /// Inclusive page bounds of the category.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            LengthCategory::Short => (1, 5),
            LengthCategory::Medium => (6, 15),
            LengthCategory::Large => (16, MAX_PAGES),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Completed,
    Cancelled,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub user: String,
    pub job_type: JobType,
    pub length_pages: u32,
    /// Seconds; informational only, never used to order execution.
    pub arrival_time: u32,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        user: impl Into<String>,
        job_type: JobType,
        length_pages: u32,
        arrival_time: u32,
    ) -> Result<Self> {
        if length_pages == 0 || length_pages > MAX_PAGES {
            return Err(SpoolError::InvalidJob(format!(
                "length must be between 1 and {} pages, got {}",
                MAX_PAGES, length_pages
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user: user.into(),
            job_type,
            length_pages,
            arrival_time,
            created_at: Utc::now(),
        })
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} Job, {} pages, Arrival Time: {} seconds.",
            self.user, self.job_type, self.length_pages, self.arrival_time
        )
    }
}
