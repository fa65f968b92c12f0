use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::scheduler::JobType;

#[derive(Debug, Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    /// Returns the number of holders after entering.
    fn enter(&self) -> usize {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        now
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Tracks how many jobs occupy each device at once.
///
/// Under a correct exclusive strategy the per-device peak never exceeds 1;
/// every time a job starts on an already occupied device a conflict is counted.
#[derive(Debug, Default)]
pub struct Occupancy {
    printer: Gauge,
    scanner: Gauge,
    jobs: Gauge,
    conflicts: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OccupancyStats {
    pub peak_printer: usize,
    pub peak_scanner: usize,
    pub peak_jobs: usize,
    pub device_conflicts: usize,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    fn gauge(&self, job_type: JobType) -> &Gauge {
        match job_type {
            JobType::Print => &self.printer,
            JobType::Scan => &self.scanner,
        }
    }

    /// Mark a job as occupying its device until the guard is dropped.
    pub fn enter(&self, job_type: JobType) -> OccupancyGuard<'_> {
        if self.gauge(job_type).enter() > 1 {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
        }
        self.jobs.enter();
        OccupancyGuard {
            occupancy: self,
            job_type,
        }
    }

    pub fn stats(&self) -> OccupancyStats {
        OccupancyStats {
            peak_printer: self.printer.peak(),
            peak_scanner: self.scanner.peak(),
            peak_jobs: self.jobs.peak(),
            device_conflicts: self.conflicts.load(Ordering::SeqCst),
        }
    }
}

pub struct OccupancyGuard<'a> {
    occupancy: &'a Occupancy,
    job_type: JobType,
}

impl Drop for OccupancyGuard<'_> {
    fn drop(&mut self) {
        self.occupancy.gauge(self.job_type).leave();
        self.occupancy.jobs.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_use_never_conflicts() {
        let occupancy = Occupancy::new();
        drop(occupancy.enter(JobType::Print));
        drop(occupancy.enter(JobType::Print));
        drop(occupancy.enter(JobType::Scan));

        let stats = occupancy.stats();
        assert_eq!(stats.peak_printer, 1);
        assert_eq!(stats.peak_scanner, 1);
        assert_eq!(stats.peak_jobs, 1);
        assert_eq!(stats.device_conflicts, 0);
    }

    #[test]
    fn overlapping_use_of_one_device_is_a_conflict() {
        let occupancy = Occupancy::new();
        let a = occupancy.enter(JobType::Print);
        let b = occupancy.enter(JobType::Print);
        drop((a, b));

        let stats = occupancy.stats();
        assert_eq!(stats.peak_printer, 2);
        assert_eq!(stats.device_conflicts, 1);
    }

    #[test]
    fn different_devices_overlap_without_conflict() {
        let occupancy = Occupancy::new();
        let _print = occupancy.enter(JobType::Print);
        let _scan = occupancy.enter(JobType::Scan);

        let stats = occupancy.stats();
        assert_eq!(stats.peak_jobs, 2);
        assert_eq!(stats.device_conflicts, 0);
    }
}
