use tokio::sync::{Mutex, MutexGuard};

use crate::scheduler::JobType;

/// One exclusive lock per device.
///
/// Print and scan jobs never contend with each other; two jobs for the same
/// device are serialized in lock acquisition order.
#[derive(Debug, Default)]
pub struct DeviceLocks {
    printer: Mutex<()>,
    scanner: Mutex<()>,
}

impl DeviceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the device a job needs. Released when the guard drops.
    pub async fn lock(&self, job_type: JobType) -> MutexGuard<'_, ()> {
        match job_type {
            JobType::Print => self.printer.lock().await,
            JobType::Scan => self.scanner.lock().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn devices_lock_independently() {
        let locks = DeviceLocks::new();
        let _printer = locks.lock(JobType::Print).await;
        assert!(locks.scanner.try_lock().is_ok());
        assert!(locks.printer.try_lock().is_err());
    }

    #[tokio::test]
    async fn dropping_guard_releases_device() {
        let locks = DeviceLocks::new();
        drop(locks.lock(JobType::Scan).await);
        assert!(locks.scanner.try_lock().is_ok());
    }
}
