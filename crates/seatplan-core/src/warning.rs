//! Warning taxonomy for allocation runs.
//!
//! Each warning has two renderings: the `Display` message returned to the
//! caller, and the [`AllocationWarning::audit_text`] note persisted to the
//! admin warning trail for a given exam slot.

use std::fmt;

use crate::domain::ExamSlot;

/// A warning produced during one allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AllocationWarning {
    /// Demand exceeds primary plus backup capacity.
    CapacityShortfall { students: usize, capacity: u64 },

    /// No usable seat exists.
    NoRoomsAvailable,

    /// Roster snapshot breaks an identifier or capacity invariant.
    InvalidRoster { reason: String },

    /// Engine settings that parse but cannot run.
    InvalidConfiguration { reason: String },

    /// Backup rooms were folded into the usable room set.
    BackupRoomsUsed,

    /// One branch holds too many students for a fully interleaved layout.
    BranchImbalance {
        branch: String,
        count: usize,
        students: usize,
    },

    /// Same-branch adjacent pairs left after repair.
    UnresolvedAdjacency { count: usize },

    /// The persistence boundary failed; nothing was written.
    DatabaseError { message: String },
}

/// Error taxonomy category of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    CapacityShortfall,
    Configuration,
    Advisory,
    AdjacencyInfeasibility,
    Persistence,
}

impl AllocationWarning {
    pub fn category(&self) -> WarningCategory {
        match self {
            Self::CapacityShortfall { .. } => WarningCategory::CapacityShortfall,
            Self::NoRoomsAvailable
            | Self::InvalidRoster { .. }
            | Self::InvalidConfiguration { .. } => WarningCategory::Configuration,
            Self::BackupRoomsUsed | Self::BranchImbalance { .. } => WarningCategory::Advisory,
            Self::UnresolvedAdjacency { .. } => WarningCategory::AdjacencyInfeasibility,
            Self::DatabaseError { .. } => WarningCategory::Persistence,
        }
    }

    /// Returns true if this warning aborts the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            WarningCategory::CapacityShortfall
                | WarningCategory::Configuration
                | WarningCategory::Persistence
        )
    }

    /// Returns the note persisted to the admin warning trail.
    ///
    /// `None` for persistence failures, which cannot be written to the
    /// store that just failed.
    pub fn audit_text(&self, exam_slot: &ExamSlot) -> Option<String> {
        match self {
            Self::CapacityShortfall { .. }
            | Self::NoRoomsAvailable
            | Self::InvalidRoster { .. }
            | Self::InvalidConfiguration { .. } => Some(self.to_string()),
            Self::BackupRoomsUsed => Some(format!("Backup rooms used for exam slot {}", exam_slot)),
            Self::BranchImbalance { .. } => {
                Some(format!("Branch imbalance for exam {}", exam_slot))
            }
            Self::UnresolvedAdjacency { count } => Some(format!(
                "Allocation had {} adjacency violations for {}",
                count, exam_slot
            )),
            Self::DatabaseError { .. } => None,
        }
    }
}

impl fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityShortfall { students, capacity } => write!(
                f,
                "Total students ({}) exceed total capacity ({}).",
                students, capacity
            ),
            Self::NoRoomsAvailable => f.write_str("No rooms available for allocation."),
            Self::InvalidRoster { reason } => write!(f, "Invalid roster: {}.", reason),
            Self::InvalidConfiguration { reason } => {
                write!(f, "Invalid allocation settings: {}.", reason)
            }
            Self::BackupRoomsUsed => {
                f.write_str("Primary rooms insufficient; backup rooms included for allocation.")
            }
            Self::BranchImbalance {
                branch,
                count,
                students,
            } => write!(
                f,
                "Branch imbalance detected ({} holds {} of {} students). \
                 Relaxed allocation strategy applied to minimize same-branch adjacency.",
                branch, count, students
            ),
            Self::UnresolvedAdjacency { count } => write!(
                f,
                "Allocation resulted in {} same-branch adjacent pairs (could not be avoided).",
                count
            ),
            Self::DatabaseError { message } => {
                write!(f, "Database error during allocation: {}", message)
            }
        }
    }
}
