//! Fault-injecting store.

use parking_lot::Mutex;
use seatplan_core::{AdminWarning, AllocationRecord, ExamSlot, Room, Student};
use seatplan_store::{
    AllocationStore, MemoryStore, MemoryTransaction, RosterGateway, StoreError, StoreTransaction,
};

/// Store operation to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Begin,
    FetchStudents,
    FetchRooms,
    ClearAllocations,
    InsertBatch,
    RecordWarning,
    Commit,
}

/// Wraps a [`MemoryStore`] and fails the armed operation.
///
/// Only the run transaction path fails; the query methods always read
/// through, so tests can inspect what was committed.
#[derive(Debug)]
pub struct FaultyStore {
    inner: MemoryStore,
    fault: Mutex<Option<Fault>>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self {
            inner,
            fault: Mutex::new(Some(fault)),
        }
    }

    /// Arms a different fault, or disarms with `None`.
    pub fn set_fault(&self, fault: Option<Fault>) {
        *self.fault.lock() = fault;
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(fault: Option<Fault>, op: Fault) -> Result<(), StoreError> {
        if fault == Some(op) {
            Err(StoreError::Unavailable(format!("injected failure at {:?}", op)))
        } else {
            Ok(())
        }
    }
}

impl RosterGateway for FaultyStore {
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
        self.inner.fetch_students()
    }

    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError> {
        self.inner.fetch_rooms()
    }
}

impl AllocationStore for FaultyStore {
    type Transaction<'a> = FaultyTransaction<'a>;

    fn begin(&self) -> Result<FaultyTransaction<'_>, StoreError> {
        let fault = *self.fault.lock();
        Self::check(fault, Fault::Begin)?;
        Ok(FaultyTransaction {
            inner: self.inner.begin()?,
            fault,
        })
    }

    fn fetch_all_allocations(&self) -> Result<Vec<AllocationRecord>, StoreError> {
        self.inner.fetch_all_allocations()
    }

    fn fetch_allocations_for_slot(
        &self,
        exam_slot: &ExamSlot,
    ) -> Result<Vec<AllocationRecord>, StoreError> {
        self.inner.fetch_allocations_for_slot(exam_slot)
    }

    fn fetch_allocation_for_student(
        &self,
        student_id: &str,
    ) -> Result<Option<AllocationRecord>, StoreError> {
        self.inner.fetch_allocation_for_student(student_id)
    }

    fn fetch_warnings(&self) -> Result<Vec<AdminWarning>, StoreError> {
        self.inner.fetch_warnings()
    }
}

/// Transaction over a [`FaultyStore`].
pub struct FaultyTransaction<'a> {
    inner: MemoryTransaction<'a>,
    fault: Option<Fault>,
}

impl RosterGateway for FaultyTransaction<'_> {
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
        FaultyStore::check(self.fault, Fault::FetchStudents)?;
        self.inner.fetch_students()
    }

    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError> {
        FaultyStore::check(self.fault, Fault::FetchRooms)?;
        self.inner.fetch_rooms()
    }
}

impl StoreTransaction for FaultyTransaction<'_> {
    fn clear_allocations(&mut self, exam_slot: &ExamSlot) -> Result<usize, StoreError> {
        FaultyStore::check(self.fault, Fault::ClearAllocations)?;
        self.inner.clear_allocations(exam_slot)
    }

    fn insert_allocation_batch(&mut self, records: &[AllocationRecord]) -> Result<(), StoreError> {
        FaultyStore::check(self.fault, Fault::InsertBatch)?;
        self.inner.insert_allocation_batch(records)
    }

    fn record_warning(&mut self, text: &str) -> Result<(), StoreError> {
        FaultyStore::check(self.fault, Fault::RecordWarning)?;
        self.inner.record_warning(text)
    }

    fn commit(self) -> Result<(), StoreError> {
        FaultyStore::check(self.fault, Fault::Commit)?;
        self.inner.commit()
    }

    fn rollback(self) -> Result<(), StoreError> {
        self.inner.rollback()
    }
}
