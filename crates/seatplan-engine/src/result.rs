//! Allocation run result.

use seatplan_core::{AllocationRecord, AllocationWarning};

use crate::scope::RunPhase;
use crate::stats::RunStats;

/// What an allocation run hands back to its caller.
///
/// On failure `allocations` is empty and `warnings` explains why.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub success: bool,
    /// Warnings in the order they were raised.
    pub warnings: Vec<AllocationWarning>,
    /// Records committed for the exam slot, grouped by room in seat order.
    pub allocations: Vec<AllocationRecord>,
    /// Terminal phase the run ended in.
    pub phase: RunPhase,
    pub stats: RunStats,
}

impl AllocationResult {
    /// Returns the warning messages as shown to end users.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Returns true if any warning matches `predicate`.
    pub fn has_warning(&self, predicate: impl Fn(&AllocationWarning) -> bool) -> bool {
        self.warnings.iter().any(predicate)
    }
}
