pub mod config;
pub mod error;
pub mod runner;
pub mod scheduler;
pub mod shutdown;
pub mod sync;
pub mod worker;

pub use error::{Result, SpoolError};
pub use runner::{RunReport, Runner};
pub use sync::{Strategy, SyncMode};
