//! Store whose transactions run side by side.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};
use seatplan_core::{AdminWarning, AllocationRecord, ExamSlot, Room, Student};
use seatplan_store::{AllocationStore, RosterGateway, StoreError, StoreTransaction};

#[derive(Debug, Default)]
struct Occupancy {
    active: HashMap<ExamSlot, usize>,
    peak: HashMap<ExamSlot, usize>,
    active_total: usize,
    peak_total: usize,
    arrived: usize,
}

/// An [`AllocationStore`] that never serializes its transactions.
///
/// A transaction counts as writing a slot from `clear_allocations` until it
/// commits, rolls back or is dropped. The store records the peak number of
/// writers per slot and overall. The first `rendezvous` writers wait in
/// `clear_allocations` for each other, up to `patience`, so any overlap the
/// caller permits actually happens.
pub struct ConcurrentStore {
    students: Vec<Student>,
    rooms: Vec<Room>,
    allocations: RwLock<Vec<AllocationRecord>>,
    warnings: RwLock<Vec<AdminWarning>>,
    occupancy: Mutex<Occupancy>,
    arrivals: Condvar,
    rendezvous: usize,
    patience: Duration,
}

impl ConcurrentStore {
    pub fn new(
        students: Vec<Student>,
        rooms: Vec<Room>,
        rendezvous: usize,
        patience: Duration,
    ) -> Self {
        Self {
            students,
            rooms,
            allocations: RwLock::new(Vec::new()),
            warnings: RwLock::new(Vec::new()),
            occupancy: Mutex::new(Occupancy::default()),
            arrivals: Condvar::new(),
            rendezvous,
            patience,
        }
    }

    /// Most transactions seen writing `exam_slot` at once.
    pub fn peak_writers(&self, exam_slot: &str) -> usize {
        self.occupancy
            .lock()
            .peak
            .get(&ExamSlot::new(exam_slot))
            .copied()
            .unwrap_or(0)
    }

    /// Most transactions seen writing at once, across all slots.
    pub fn peak_writers_total(&self) -> usize {
        self.occupancy.lock().peak_total
    }

    fn enter(&self, exam_slot: &ExamSlot) {
        let mut occupancy = self.occupancy.lock();
        let active = occupancy.active.entry(exam_slot.clone()).or_default();
        *active += 1;
        let now = *active;
        let peak = occupancy.peak.entry(exam_slot.clone()).or_default();
        *peak = (*peak).max(now);
        occupancy.active_total += 1;
        occupancy.peak_total = occupancy.peak_total.max(occupancy.active_total);
        occupancy.arrived += 1;

        if occupancy.arrived >= self.rendezvous {
            self.arrivals.notify_all();
            return;
        }
        let deadline = Instant::now() + self.patience;
        while occupancy.arrived < self.rendezvous {
            if self
                .arrivals
                .wait_until(&mut occupancy, deadline)
                .timed_out()
            {
                break;
            }
        }
    }

    fn leave(&self, exam_slot: &ExamSlot) {
        let mut occupancy = self.occupancy.lock();
        if let Some(active) = occupancy.active.get_mut(exam_slot) {
            *active -= 1;
        }
        occupancy.active_total -= 1;
    }
}

impl fmt::Debug for ConcurrentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentStore")
            .field("students", &self.students.len())
            .field("rooms", &self.rooms.len())
            .field("occupancy", &*self.occupancy.lock())
            .finish()
    }
}

impl RosterGateway for ConcurrentStore {
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
        let mut students = self.students.clone();
        students.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(students)
    }

    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError> {
        let mut rooms = self.rooms.clone();
        rooms.sort_by(|a, b| a.is_backup.cmp(&b.is_backup).then_with(|| a.id.cmp(&b.id)));
        Ok(rooms)
    }
}

impl AllocationStore for ConcurrentStore {
    type Transaction<'a> = ConcurrentTransaction<'a>;

    fn begin(&self) -> Result<ConcurrentTransaction<'_>, StoreError> {
        Ok(ConcurrentTransaction {
            store: self,
            writing: None,
            inserted: Vec::new(),
            warnings: Vec::new(),
        })
    }

    fn fetch_all_allocations(&self) -> Result<Vec<AllocationRecord>, StoreError> {
        let mut records = self.allocations.read().clone();
        records.sort_by(|a, b| {
            (&a.room_id, a.seat_no, &a.exam_slot).cmp(&(&b.room_id, b.seat_no, &b.exam_slot))
        });
        Ok(records)
    }

    fn fetch_allocations_for_slot(
        &self,
        exam_slot: &ExamSlot,
    ) -> Result<Vec<AllocationRecord>, StoreError> {
        let mut records = self.fetch_all_allocations()?;
        records.retain(|r| r.exam_slot == *exam_slot);
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
        Ok(self.warnings.read().clone())
    }
}

/// Transaction over a [`ConcurrentStore`].
pub struct ConcurrentTransaction<'a> {
    store: &'a ConcurrentStore,
    writing: Option<ExamSlot>,
    inserted: Vec<AllocationRecord>,
    warnings: Vec<String>,
}

impl RosterGateway for ConcurrentTransaction<'_> {
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
        self.store.fetch_students()
    }

    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.store.fetch_rooms()
    }
}

impl StoreTransaction for ConcurrentTransaction<'_> {
    fn clear_allocations(&mut self, exam_slot: &ExamSlot) -> Result<usize, StoreError> {
        if self.writing.is_none() {
            self.store.enter(exam_slot);
            self.writing = Some(exam_slot.clone());
        }
        Ok(self
            .store
            .allocations
            .read()
            .iter()
            .filter(|r| r.exam_slot == *exam_slot)
            .count())
    }

    fn insert_allocation_batch(&mut self, records: &[AllocationRecord]) -> Result<(), StoreError> {
        self.inserted.extend_from_slice(records);
        Ok(())
    }

    fn record_warning(&mut self, text: &str) -> Result<(), StoreError> {
        self.warnings.push(text.to_string());
        Ok(())
    }

    fn commit(mut self) -> Result<(), StoreError> {
        if let Some(exam_slot) = &self.writing {
            let mut allocations = self.store.allocations.write();
            allocations.retain(|r| r.exam_slot != *exam_slot);
            allocations.append(&mut self.inserted);
        }
        let mut warnings = self.store.warnings.write();
        for text in self.warnings.drain(..) {
            let id = warnings.len() as u64 + 1;
            warnings.push(AdminWarning::new(id, text));
        }
        Ok(())
    }

    fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl Drop for ConcurrentTransaction<'_> {
    fn drop(&mut self) {
        if let Some(exam_slot) = self.writing.take() {
            self.store.leave(&exam_slot);
        }
    }
}
