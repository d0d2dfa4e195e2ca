//! Seating invariant checks.

use std::collections::{HashMap, HashSet};

use seatplan_core::{AllocationRecord, Room, Student};

/// Checks a committed seating against its roster and rooms.
///
/// Verifies that every rostered student holds exactly one seat, that no
/// unknown student is seated, that seat numbers within a room are unique
/// and dense from 1, and that no room exceeds its capacity.
pub fn check_seating(
    records: &[AllocationRecord],
    roster: &[Student],
    rooms: &[Room],
) -> Result<(), String> {
    let expected: HashSet<&str> = roster.iter().map(|s| s.id.as_str()).collect();
    let mut seated = HashSet::new();
    for record in records {
        if !expected.contains(record.student_id.as_str()) {
            return Err(format!("unknown student {} seated", record.student_id));
        }
        if !seated.insert(record.student_id.as_str()) {
            return Err(format!("student {} seated twice", record.student_id));
        }
    }
    if seated.len() != expected.len() {
        return Err(format!(
            "{} of {} students seated",
            seated.len(),
            expected.len()
        ));
    }

    let mut seats_by_room: HashMap<&str, Vec<u32>> = HashMap::new();
    for record in records {
        seats_by_room
            .entry(record.room_id.as_str())
            .or_default()
            .push(record.seat_no);
    }
    for (room_id, mut seats) in seats_by_room {
        let room = rooms
            .iter()
            .find(|r| r.id == room_id)
            .ok_or_else(|| format!("unknown room {}", room_id))?;
        if seats.len() > room.capacity as usize {
            return Err(format!(
                "room {} holds {} students but seats {}",
                room_id,
                seats.len(),
                room.capacity
            ));
        }
        seats.sort_unstable();
        let dense: Vec<u32> = (1..=seats.len() as u32).collect();
        if seats != dense {
            return Err(format!("room {} seats not dense: {:?}", room_id, seats));
        }
    }
    Ok(())
}
