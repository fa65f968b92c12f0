pub mod generator;
pub mod job;
pub mod queue;

pub use generator::{user_names, JobGenerator};
pub use job::{Job, JobStatus, JobType, LengthCategory};
pub use queue::{DispatchQueue, JobQueue};
