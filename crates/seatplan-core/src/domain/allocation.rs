//! Seat assignment record.

use std::fmt;

use super::{ExamSlot, Room, Student};

/// One student's seat for one exam slot.
///
/// Seat numbers are 1-based and dense within a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationRecord {
    pub student_id: String,
    pub student_name: String,
    pub branch: String,
    pub room_id: String,
    pub seat_no: u32,
    pub exam_slot: ExamSlot,
}

impl AllocationRecord {
    pub fn new(student: &Student, room: &Room, seat_no: u32, exam_slot: &ExamSlot) -> Self {
        Self {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            branch: student.branch.clone(),
            room_id: room.id.clone(),
            seat_no,
            exam_slot: exam_slot.clone(),
        }
    }

    /// Rebuilds the student this record seats.
    pub fn student(&self) -> Student {
        Student::new(&self.student_id, &self.student_name, &self.branch)
    }
}

impl fmt::Display for AllocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {} | {}",
            self.student_id,
            self.student_name,
            self.branch,
            self.room_id,
            self.seat_no,
            self.exam_slot
        )
    }
}
