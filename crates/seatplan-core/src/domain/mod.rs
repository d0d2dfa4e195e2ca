//! Data model for exam seat allocation
//!
//! - `Student`, `Room`, `ExamSlot`: read-only inputs created by ingestion
//! - `AllocationRecord`: one seat assignment, regenerated per run
//! - `AdminWarning`: append-only audit note

mod allocation;
mod audit;
mod room;
mod student;


pub use allocation::AllocationRecord;
pub use audit::AdminWarning;
pub use room::{ExamSlot, Room};
pub use student::Student;

use std::collections::HashSet;

use crate::error::{Result, SeatPlanError};

/// Checks the invariants of a roster snapshot.
///
/// Student ids and room ids must be unique, and every room must hold at
/// least one seat.
pub fn validate_inventory(students: &[Student], rooms: &[Room]) -> Result<()> {
    let mut seen = HashSet::with_capacity(students.len());
    for student in students {
        if !seen.insert(student.id.as_str()) {
            return Err(SeatPlanError::InvalidRoster(format!(
                "duplicate student id '{}'",
                student.id
            )));
        }
    }

    let mut seen = HashSet::with_capacity(rooms.len());
    for room in rooms {
        if !seen.insert(room.id.as_str()) {
            return Err(SeatPlanError::InvalidRoster(format!(
                "duplicate room id '{}'",
                room.id
            )));
        }
        if room.capacity == 0 {
            return Err(SeatPlanError::InvalidRoster(format!(
                "room '{}' has no seats",
                room.id
            )));
        }
    }
    Ok(())
}
