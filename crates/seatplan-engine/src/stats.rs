//! Run statistics.

use std::time::{Duration, Instant};

/// Counters for one allocation run.
///
/// # Example
///
/// ```
/// use seatplan_engine::stats::RunStats;
///
/// let mut stats = RunStats::default();
/// stats.start();
/// stats.record_repair(3, 2, 1);
///
/// assert_eq!(stats.violations_found, 3);
/// assert_eq!(stats.swaps, 2);
/// assert_eq!(stats.unresolved, 1);
/// assert!((stats.repair_rate() - 2.0 / 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    start_time: Option<Instant>,
    elapsed: Option<Duration>,
    /// Students in the roster snapshot.
    pub students: usize,
    /// Distinct rooms that received at least one student.
    pub rooms_used: usize,
    /// Backup rooms among `rooms_used`.
    pub backup_rooms_used: usize,
    /// Same-branch pairs met by the repair pass.
    pub violations_found: usize,
    /// Cross-room swaps performed.
    pub swaps: usize,
    /// Pairs the repair pass left in place.
    pub unresolved: usize,
    /// Same-branch pairs present in the final seating.
    pub residual_pairs: usize,
}

impl RunStats {
    /// Marks the start of the run.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.elapsed = None;
    }

    /// Freezes the elapsed time.
    pub fn finish(&mut self) {
        self.elapsed = Some(self.live_elapsed());
    }

    /// Returns the run duration, or the time since start while running.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.live_elapsed())
    }

    fn live_elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Records the outcome of the repair pass.
    pub fn record_repair(&mut self, found: usize, swaps: usize, unresolved: usize) {
        self.violations_found = found;
        self.swaps = swaps;
        self.unresolved = unresolved;
    }

    /// Returns the share of encountered pairs that were repaired.
    pub fn repair_rate(&self) -> f64 {
        if self.violations_found == 0 {
            1.0
        } else {
            self.swaps as f64 / self.violations_found as f64
        }
    }
}
