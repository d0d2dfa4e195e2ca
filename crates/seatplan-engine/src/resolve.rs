//! Adjacency repair.
//!
//! Scans each room for consecutive seats held by students of the same
//! branch. For every such pair the resolver looks through the other rooms,
//! in room order then seat order, for a student whose branch differs from
//! both ends of the pair, and swaps that student into the later seat.
//!
//! This is a single pass: a swap is never re-validated against the room it
//! sent a student to, so it can create a pair elsewhere that a room already
//! scanned will not revisit. The cost stays bounded by one scan of every
//! seat per violation.

use seatplan_core::AllocationRecord;
use tracing::trace;

/// Result of one repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Records grouped by room, seat numbers dense from 1.
    pub records: Vec<AllocationRecord>,
    /// Same-branch pairs encountered during the scan.
    pub violations_found: usize,
    /// Pairs fixed by a cross-room swap.
    pub swaps: usize,
    /// Pairs left in place.
    pub unresolved: usize,
}

#[derive(Debug)]
struct RoomSeats {
    room_id: String,
    seats: Vec<AllocationRecord>,
}

/// Groups records by room, preserving first-appearance room order and the
/// record order within each room.
fn group_by_room(records: Vec<AllocationRecord>) -> Vec<RoomSeats> {
    let mut rooms: Vec<RoomSeats> = Vec::new();
    for record in records {
        match rooms.iter_mut().find(|r| r.room_id == record.room_id) {
            Some(room) => room.seats.push(record),
            None => rooms.push(RoomSeats {
                room_id: record.room_id.clone(),
                seats: vec![record],
            }),
        }
    }
    rooms
}

fn find_swap_candidate(
    rooms: &[RoomSeats],
    current: usize,
    left: &str,
    right: &str,
) -> Option<(usize, usize)> {
    rooms
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != current)
        .find_map(|(index, room)| {
            room.seats
                .iter()
                .position(|s| s.branch != left && s.branch != right)
                .map(|seat| (index, seat))
        })
}

/// Runs one repair pass over seat assignments.
///
/// `records` must list each room's seats in seat order. `max_swaps` bounds
/// the swaps performed; once exhausted, further pairs count as unresolved.
/// Room occupancy never changes, only which student sits where.
pub fn resolve_adjacency(records: Vec<AllocationRecord>, max_swaps: Option<usize>) -> Resolution {
    let mut rooms = group_by_room(records);
    let mut resolution = Resolution::default();

    for current in 0..rooms.len() {
        for seat in 1..rooms[current].seats.len() {
            let left = &rooms[current].seats[seat - 1].branch;
            let right = &rooms[current].seats[seat].branch;
            if left != right {
                continue;
            }
            resolution.violations_found += 1;

            let budget_left = max_swaps.map_or(true, |max| resolution.swaps < max);
            let candidate = if budget_left {
                find_swap_candidate(&rooms, current, left, right)
            } else {
                None
            };

            match candidate {
                Some((other, other_seat)) => {
                    let incoming = rooms[other].seats[other_seat].clone();
                    trace!(
                        event = "adjacency_swap",
                        room = %rooms[current].room_id,
                        seat = seat + 1,
                        student = %rooms[current].seats[seat].student_id,
                        with_room = %rooms[other].room_id,
                        with_student = %incoming.student_id,
                    );
                    let outgoing = std::mem::replace(&mut rooms[current].seats[seat], incoming);
                    rooms[other].seats[other_seat] = outgoing;
                    resolution.swaps += 1;
                }
                None => resolution.unresolved += 1,
            }
        }
    }

    resolution.records = renumber(rooms);
    resolution
}

/// Flattens rooms back into records, assigning each record its room and a
/// dense seat number.
fn renumber(rooms: Vec<RoomSeats>) -> Vec<AllocationRecord> {
    let mut records = Vec::with_capacity(rooms.iter().map(|r| r.seats.len()).sum());
    for room in rooms {
        for (index, mut record) in room.seats.into_iter().enumerate() {
            record.room_id = room.room_id.clone();
            record.seat_no = index as u32 + 1;
            records.push(record);
        }
    }
    records
}

/// Counts same-branch pairs on consecutive seats of the same room.
///
/// `records` must list each room's seats contiguously in seat order.
pub fn count_violations(records: &[AllocationRecord]) -> usize {
    records
        .windows(2)
        .filter(|pair| pair[0].room_id == pair[1].room_id && pair[0].branch == pair[1].branch)
        .count()
}
