//! Sequential seat assignment.

use seatplan_core::{AllocationRecord, ExamSlot, Room, Student};

/// Seats `students` in order, filling each room from seat 1 up to its
/// capacity before moving to the next room.
///
/// Stops when the roster or the rooms run out; callers guarantee enough
/// capacity through capacity planning, so every student is seated in
/// practice. Rooms left empty produce no records.
pub fn assign_seats(
    students: &[Student],
    rooms: &[Room],
    exam_slot: &ExamSlot,
) -> Vec<AllocationRecord> {
    let mut records = Vec::with_capacity(students.len());
    let mut remaining = students.iter();

    'rooms: for room in rooms {
        for seat_no in 1..=room.capacity {
            let Some(student) = remaining.next() else {
                break 'rooms;
            };
            records.push(AllocationRecord::new(student, room, seat_no, exam_slot));
        }
    }
    records
}
