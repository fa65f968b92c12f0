//! Device simulation for running jobs.
//!
//! This module handles what happens once a worker context holds a job:
//! - **Execution**: walks the job page by page on its device
//! - **Events**: records creation, progress and completion in a shared log
//! - **Occupancy**: measures how many jobs hold each device at once
//!
//! # Components
//!
//! - [`DeviceExecutor`]: simulates the device, one page per configured interval
//! - [`EventLog`]: totally ordered log of [`Event`]s across all workers
//! - [`Occupancy`]: per-device gauges used to detect unsynchronized access
//!
//! # Execution Flow
//!
//! 1. A worker takes a job and acquires whatever its strategy demands
//! 2. [`DeviceExecutor::execute`] marks the device occupied
//! 3. One progress event per page, then a completion event
//! 4. Returns an [`ExecutionResult`](executor::ExecutionResult)
//!
//! The executor performs no locking itself; see [`crate::sync`].

pub mod events;
pub mod executor;
pub mod occupancy;

pub use events::{Event, EventKind, EventLog};
pub use executor::{DeviceExecutor, ExecutionResult};
pub use occupancy::{Occupancy, OccupancyStats};
