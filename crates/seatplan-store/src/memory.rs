//! In-memory transactional store.
//!
//! Committed state lives behind a `parking_lot::RwLock`. A transaction holds
//! the writer mutex for its whole lifetime, so transactions are serialized,
//! and stages its writes on a private copy of the allocation table that is
//! swapped in on commit.

use std::collections::HashSet;
use std::fmt;

use parking_lot::{Mutex, MutexGuard, RwLock};
use seatplan_core::{AdminWarning, AllocationRecord, ExamSlot, Room, Student};
use tracing::{debug, trace};

use crate::{AllocationStore, RosterGateway, StoreError, StoreTransaction};

#[derive(Debug, Default)]
struct StoreState {
    students: Vec<Student>,
    rooms: Vec<Room>,
    allocations: Vec<AllocationRecord>,
    warnings: Vec<AdminWarning>,
}

impl StoreState {
    fn sorted_students(&self) -> Vec<Student> {
        let mut students = self.students.clone();
        students.sort_by(|a, b| a.id.cmp(&b.id));
        students
    }

    fn sorted_rooms(&self) -> Vec<Room> {
        let mut rooms = self.rooms.clone();
        rooms.sort_by(|a, b| a.is_backup.cmp(&b.is_backup).then_with(|| a.id.cmp(&b.id)));
        rooms
    }
}

/// An in-process [`AllocationStore`].
///
/// # Example
///
/// ```
/// use seatplan_core::{ExamSlot, Room, Student};
/// use seatplan_store::{AllocationStore, MemoryStore, RosterGateway, StoreTransaction};
///
/// let store = MemoryStore::with_roster(
///     vec![Student::new("S01", "Alice", "CSE")],
///     vec![Room::primary("R1", 10)],
/// );
/// assert_eq!(store.fetch_students().unwrap().len(), 1);
///
/// let mut tx = store.begin().unwrap();
/// tx.record_warning("dry run").unwrap();
/// tx.rollback().unwrap();
/// assert!(store.fetch_warnings().unwrap().is_empty());
/// ```
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
    writer: Mutex<()>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with a roster and room inventory.
    pub fn with_roster(students: Vec<Student>, rooms: Vec<Room>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                students,
                rooms,
                ..StoreState::default()
            }),
            writer: Mutex::new(()),
        }
    }

    /// Adds a student to the roster.
    pub fn add_student(&self, student: Student) {
        self.state.write().students.push(student);
    }

    /// Adds a room to the inventory.
    pub fn add_room(&self, room: Room) {
        self.state.write().rooms.push(room);
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemoryStore")
            .field("students", &state.students.len())
            .field("rooms", &state.rooms.len())
            .field("allocations", &state.allocations.len())
            .field("warnings", &state.warnings.len())
            .finish()
    }
}

impl RosterGateway for MemoryStore {
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.state.read().sorted_students())
    }

    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.state.read().sorted_rooms())
    }
}

impl AllocationStore for MemoryStore {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> Result<MemoryTransaction<'_>, StoreError> {
        let writer = self.writer.lock();
        let allocations = self.state.read().allocations.clone();
        Ok(MemoryTransaction {
            store: self,
            _writer: writer,
            allocations,
            warnings: Vec::new(),
        })
    }

    fn fetch_all_allocations(&self) -> Result<Vec<AllocationRecord>, StoreError> {
        let mut records = self.state.read().allocations.clone();
        sort_for_report(&mut records);
        Ok(records)
    }

    fn fetch_allocations_for_slot(
        &self,
        exam_slot: &ExamSlot,
    ) -> Result<Vec<AllocationRecord>, StoreError> {
        let mut records: Vec<_> = self
            .state
            .read()
            .allocations
            .iter()
            .filter(|r| &r.exam_slot == exam_slot)
            .cloned()
            .collect();
        sort_for_report(&mut records);
        Ok(records)
    }

    fn fetch_allocation_for_student(
        &self,
        student_id: &str,
    ) -> Result<Option<AllocationRecord>, StoreError> {
        Ok(self
            .fetch_all_allocations()?
            .into_iter()
            .find(|r| r.student_id == student_id))
    }

    fn fetch_warnings(&self) -> Result<Vec<AdminWarning>, StoreError> {
        Ok(self.state.read().warnings.clone())
    }
}

fn sort_for_report(records: &mut [AllocationRecord]) {
    records.sort_by(|a, b| {
        a.room_id
            .cmp(&b.room_id)
            .then(a.seat_no.cmp(&b.seat_no))
            .then_with(|| a.exam_slot.cmp(&b.exam_slot))
    });
}

/// Transaction over a [`MemoryStore`].
pub struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    _writer: MutexGuard<'a, ()>,
    allocations: Vec<AllocationRecord>,
    warnings: Vec<String>,
}

impl MemoryTransaction<'_> {
    fn check_batch(&self, records: &[AllocationRecord]) -> Result<(), StoreError> {
        let state = self.store.state.read();
        let students: HashSet<&str> = state.students.iter().map(|s| s.id.as_str()).collect();
        let rooms: HashSet<&str> = state.rooms.iter().map(|r| r.id.as_str()).collect();

        let mut seated: HashSet<(&str, &ExamSlot)> = self
            .allocations
            .iter()
            .map(|r| (r.student_id.as_str(), &r.exam_slot))
            .collect();
        let mut seats: HashSet<(&str, u32, &ExamSlot)> = self
            .allocations
            .iter()
            .map(|r| (r.room_id.as_str(), r.seat_no, &r.exam_slot))
            .collect();

        for record in records {
            if !students.contains(record.student_id.as_str()) {
                return Err(StoreError::Constraint(format!(
                    "unknown student '{}'",
                    record.student_id
                )));
            }
            if !rooms.contains(record.room_id.as_str()) {
                return Err(StoreError::Constraint(format!(
                    "unknown room '{}'",
                    record.room_id
                )));
            }
            if record.seat_no == 0 {
                return Err(StoreError::Constraint(format!(
                    "seat numbers start at 1 (student '{}')",
                    record.student_id
                )));
            }
            if !seated.insert((record.student_id.as_str(), &record.exam_slot)) {
                return Err(StoreError::Constraint(format!(
                    "student '{}' already seated for exam slot {}",
                    record.student_id, record.exam_slot
                )));
            }
            if !seats.insert((record.room_id.as_str(), record.seat_no, &record.exam_slot)) {
                return Err(StoreError::Constraint(format!(
                    "seat {} in room '{}' already taken for exam slot {}",
                    record.seat_no, record.room_id, record.exam_slot
                )));
            }
        }
        Ok(())
    }
}

impl RosterGateway for MemoryTransaction<'_> {
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
        self.store.fetch_students()
    }

    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.store.fetch_rooms()
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn clear_allocations(&mut self, exam_slot: &ExamSlot) -> Result<usize, StoreError> {
        let before = self.allocations.len();
        self.allocations.retain(|r| &r.exam_slot != exam_slot);
        Ok(before - self.allocations.len())
    }

    fn insert_allocation_batch(&mut self, records: &[AllocationRecord]) -> Result<(), StoreError> {
        self.check_batch(records)?;
        self.allocations.extend_from_slice(records);
        Ok(())
    }

    fn record_warning(&mut self, text: &str) -> Result<(), StoreError> {
        self.warnings.push(text.to_string());
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        let mut state = self.store.state.write();
        state.allocations = self.allocations;
        let first_id = state.warnings.last().map_or(1, |w| w.id + 1);
        let staged = self.warnings.len();
        for (offset, text) in self.warnings.into_iter().enumerate() {
            state
                .warnings
                .push(AdminWarning::new(first_id + offset as u64, text));
        }
        debug!(
            event = "store_commit",
            allocations = state.allocations.len(),
            warnings = staged,
        );
        Ok(())
    }

    fn rollback(self) -> Result<(), StoreError> {
        trace!(
            event = "store_rollback",
            discarded_warnings = self.warnings.len(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
