//! Mutual-exclusion strategies for the shared devices.
//!
//! A run picks exactly one [`SyncMode`]. The matching [`Strategy`] owns all of
//! its synchronization state and is shared by the worker contexts of that run;
//! nothing here is process-global.
//!
//! | Mode | Guards | Exclusion |
//! |---|---|---|
//! | `Unsynchronized` | nothing | none, devices may be double-booked |
//! | `MutexPerDevice` | printer and scanner separately | per device |
//! | `SemaphoreQueue` | "take next job and run it" | all jobs serialized |
//! | `PetersonPrinterOnly` | printer, two contexts at most | printer only |

pub mod device_lock;
pub mod peterson;

use std::str::FromStr;

use serde::Serialize;
use tokio::sync::Semaphore;

use crate::error::{Result, SpoolError};
use crate::scheduler::{DispatchQueue, JobType};
use crate::worker::{DeviceExecutor, ExecutionResult};

pub use device_lock::DeviceLocks;
pub use peterson::{PetersonGuard, PetersonLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    Unsynchronized,
    MutexPerDevice,
    SemaphoreQueue,
    PetersonPrinterOnly,
}

impl SyncMode {
    pub const ALL: [SyncMode; 4] = [
        SyncMode::Unsynchronized,
        SyncMode::MutexPerDevice,
        SyncMode::SemaphoreQueue,
        SyncMode::PetersonPrinterOnly,
    ];

    /// Menu number shown to the operator
    pub fn number(&self) -> u8 {
        match self {
            SyncMode::Unsynchronized => 1,
            SyncMode::MutexPerDevice => 2,
            SyncMode::SemaphoreQueue => 3,
            SyncMode::PetersonPrinterOnly => 4,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SyncMode::Unsynchronized => "Run without synchronization",
            SyncMode::MutexPerDevice => "Run with mutex synchronization",
            SyncMode::SemaphoreQueue => "Run with semaphore synchronization",
            SyncMode::PetersonPrinterOnly => "Run with Peterson's solution (for printer)",
        }
    }

    /// Most worker contexts the mode can arbitrate, if bounded.
    pub fn max_contexts(&self) -> Option<usize> {
        match self {
            SyncMode::PetersonPrinterOnly => Some(peterson::PARTIES),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Unsynchronized => write!(f, "unsynchronized"),
            SyncMode::MutexPerDevice => write!(f, "mutex-per-device"),
            SyncMode::SemaphoreQueue => write!(f, "semaphore-queue"),
            SyncMode::PetersonPrinterOnly => write!(f, "peterson-printer-only"),
        }
    }
}

impl FromStr for SyncMode {
    type Err = SpoolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "none" | "unsynchronized" => Ok(SyncMode::Unsynchronized),
            "2" | "mutex" | "mutex-per-device" => Ok(SyncMode::MutexPerDevice),
            "3" | "semaphore" | "semaphore-queue" => Ok(SyncMode::SemaphoreQueue),
            "4" | "peterson" | "peterson-printer-only" => Ok(SyncMode::PetersonPrinterOnly),
            other => Err(SpoolError::Configuration(format!(
                "invalid mode {:?}, choose between 1-4",
                other
            ))),
        }
    }
}

/// Synchronization state for one run.
#[derive(Debug)]
pub enum Strategy {
    Unsynchronized,
    MutexPerDevice(DeviceLocks),
    /// Single permit around taking and executing a job.
    SemaphoreQueue(Semaphore),
    PetersonPrinterOnly(PetersonLock),
}

impl Strategy {
    /// Build the strategy for `contexts` concurrent worker contexts.
    ///
    /// Fails before any job runs if the mode cannot arbitrate that many.
    pub fn new(mode: SyncMode, contexts: usize) -> Result<Self> {
        let strategy = match mode {
            SyncMode::Unsynchronized => Strategy::Unsynchronized,
            SyncMode::MutexPerDevice => Strategy::MutexPerDevice(DeviceLocks::new()),
            SyncMode::SemaphoreQueue => Strategy::SemaphoreQueue(Semaphore::new(1)),
            SyncMode::PetersonPrinterOnly => {
                PetersonLock::check_contenders(contexts)?;
                Strategy::PetersonPrinterOnly(PetersonLock::new())
            }
        };
        Ok(strategy)
    }

    pub fn mode(&self) -> SyncMode {
        match self {
            Strategy::Unsynchronized => SyncMode::Unsynchronized,
            Strategy::MutexPerDevice(_) => SyncMode::MutexPerDevice,
            Strategy::SemaphoreQueue(_) => SyncMode::SemaphoreQueue,
            Strategy::PetersonPrinterOnly(_) => SyncMode::PetersonPrinterOnly,
        }
    }

    /// Take the next job from `queue` and execute it under this strategy.
    ///
    /// Returns `None` once the queue is drained. Every permit is a guard
    /// scoped to this call.
    pub async fn process_next(
        &self,
        worker: usize,
        queue: &DispatchQueue,
        executor: &DeviceExecutor,
    ) -> Result<Option<ExecutionResult>> {
        match self {
            Strategy::Unsynchronized => {
                let Some(job) = queue.take_next() else {
                    return Ok(None);
                };
                Ok(Some(executor.execute(worker, &job).await))
            }
            Strategy::MutexPerDevice(locks) => {
                let Some(job) = queue.take_next() else {
                    return Ok(None);
                };
                let _device = locks.lock(job.job_type).await;
                Ok(Some(executor.execute(worker, &job).await))
            }
            Strategy::SemaphoreQueue(permits) => {
                let _permit = permits
                    .acquire()
                    .await
                    .map_err(|e| SpoolError::Internal(format!("job queue semaphore: {}", e)))?;
                let Some(job) = queue.take_next() else {
                    return Ok(None);
                };
                Ok(Some(executor.execute(worker, &job).await))
            }
            Strategy::PetersonPrinterOnly(lock) => {
                let Some(job) = queue.take_next() else {
                    return Ok(None);
                };
                match job.job_type {
                    JobType::Print => {
                        let _printer = lock.acquire(worker).await?;
                        Ok(Some(executor.execute(worker, &job).await))
                    }
                    // Scanner access is not arbitrated by this strategy
                    JobType::Scan => Ok(Some(executor.execute(worker, &job).await)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_menu_numbers() {
        for mode in SyncMode::ALL {
            let parsed: SyncMode = mode.number().to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("mutex".parse::<SyncMode>().unwrap(), SyncMode::MutexPerDevice);
        assert_eq!(" Peterson \n".parse::<SyncMode>().unwrap(), SyncMode::PetersonPrinterOnly);
        assert_eq!("semaphore-queue".parse::<SyncMode>().unwrap(), SyncMode::SemaphoreQueue);
        assert_eq!("none".parse::<SyncMode>().unwrap(), SyncMode::Unsynchronized);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for mode in SyncMode::ALL {
            assert_eq!(mode.to_string().parse::<SyncMode>().unwrap(), mode);
        }
    }

    #[test]
    fn parse_rejects_out_of_range_choice() {
        for input in ["9", "0", "", "spinlock"] {
            assert!(matches!(
                input.parse::<SyncMode>(),
                Err(SpoolError::Configuration(_))
            ));
        }
    }

    #[test]
    fn only_peterson_bounds_contexts() {
        assert_eq!(SyncMode::PetersonPrinterOnly.max_contexts(), Some(2));
        assert_eq!(SyncMode::MutexPerDevice.max_contexts(), None);
    }

    #[test]
    fn strategy_rejects_peterson_with_three_contexts() {
        assert!(matches!(
            Strategy::new(SyncMode::PetersonPrinterOnly, 3),
            Err(SpoolError::ContentionViolation { contexts: 3 })
        ));
        assert!(Strategy::new(SyncMode::PetersonPrinterOnly, 2).is_ok());
        assert!(Strategy::new(SyncMode::MutexPerDevice, 50).is_ok());
    }

    #[test]
    fn strategy_reports_its_mode() {
        for mode in SyncMode::ALL {
            assert_eq!(Strategy::new(mode, 2).unwrap().mode(), mode);
        }
    }
}
