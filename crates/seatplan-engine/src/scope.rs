//! Run scope and lifecycle state machine.
//!
//! ```text
//! Planning -> Failed
//! Planning -> Balancing -> Assigning -> Resolving -> Persisting -> Committed
//! Planning | Persisting -> RolledBack
//! ```
//!
//! Terminal states are never left.

use std::fmt;

use seatplan_core::{AllocationWarning, ExamSlot};
use tracing::{debug, warn};

use crate::stats::RunStats;

/// Lifecycle phase of an allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    Planning,
    Balancing,
    Assigning,
    Resolving,
    Persisting,
    Committed,
    RolledBack,
    Failed,
}

impl RunPhase {
    /// Returns true for `Committed`, `RolledBack` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack | Self::Failed)
    }

    /// Returns true if the run may move from `self` to `next`.
    pub fn can_advance_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Planning, Failed)
                | (Planning, Balancing)
                | (Planning, RolledBack)
                | (Balancing, Assigning)
                | (Assigning, Resolving)
                | (Resolving, Persisting)
                | (Persisting, Committed)
                | (Persisting, RolledBack)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Balancing => "balancing",
            Self::Assigning => "assigning",
            Self::Resolving => "resolving",
            Self::Persisting => "persisting",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state carried through one allocation run.
#[derive(Debug)]
pub struct RunScope {
    exam_slot: ExamSlot,
    phase: RunPhase,
    warnings: Vec<AllocationWarning>,
    stats: RunStats,
}

impl RunScope {
    pub fn new(exam_slot: ExamSlot) -> Self {
        let mut stats = RunStats::default();
        stats.start();
        Self {
            exam_slot,
            phase: RunPhase::Planning,
            warnings: Vec::new(),
            stats,
        }
    }

    pub fn exam_slot(&self) -> &ExamSlot {
        &self.exam_slot
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Moves to `next`.
    ///
    /// Illegal transitions are ignored and logged; the pipeline only
    /// requests legal ones.
    pub fn advance(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal run transition {} -> {}",
            self.phase,
            next
        );
        if !self.phase.can_advance_to(next) {
            warn!(
                event = "illegal_transition",
                exam_slot = %self.exam_slot,
                from = %self.phase,
                to = %next,
            );
            return;
        }
        debug!(
            event = "phase_transition",
            exam_slot = %self.exam_slot,
            from = %self.phase,
            to = %next,
        );
        self.phase = next;
        if next.is_terminal() {
            self.stats.finish();
        }
    }

    /// Adds a warning to the run.
    pub fn warn(&mut self, warning: AllocationWarning) {
        warn!(
            event = "allocation_warning",
            exam_slot = %self.exam_slot,
            warning = %warning,
        );
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[AllocationWarning] {
        &self.warnings
    }

    /// Returns the audit notes for the warnings collected so far.
    pub fn audit_texts(&self) -> Vec<String> {
        self.warnings
            .iter()
            .filter_map(|w| w.audit_text(&self.exam_slot))
            .collect()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    pub(crate) fn into_parts(self) -> (RunPhase, Vec<AllocationWarning>, RunStats) {
        (self.phase, self.warnings, self.stats)
    }
}
