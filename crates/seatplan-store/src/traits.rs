//! Store traits.

use seatplan_core::{AdminWarning, AllocationRecord, ExamSlot, Room, Student};

use crate::StoreError;

/// Read access to the roster and room inventory.
pub trait RosterGateway {
    /// Returns every student, ordered by id.
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError>;

    /// Returns every room: primary rooms first, then backup rooms, each
    /// group ordered by id.
    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError>;
}

/// One atomic unit of work against the store.
///
/// Reads observe committed state only, never another transaction's staged
/// writes.
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// every staged write.
pub trait StoreTransaction: RosterGateway + Sized {
    /// Deletes all allocation records for `exam_slot`. Returns how many
    /// records were removed.
    fn clear_allocations(&mut self, exam_slot: &ExamSlot) -> Result<usize, StoreError>;

    /// Inserts a batch of allocation records. The batch is rejected as a
    /// whole if any record breaks a constraint.
    fn insert_allocation_batch(&mut self, records: &[AllocationRecord]) -> Result<(), StoreError>;

    /// Appends a note to the admin warning trail.
    fn record_warning(&mut self, text: &str) -> Result<(), StoreError>;

    /// Makes every staged write visible.
    fn commit(self) -> Result<(), StoreError>;

    /// Discards every staged write.
    fn rollback(self) -> Result<(), StoreError>;
}

/// A transactional store holding allocations and the warning trail.
pub trait AllocationStore: RosterGateway + Send + Sync {
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    /// Opens a transaction.
    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError>;

    /// Returns every allocation record, ordered by room then seat.
    fn fetch_all_allocations(&self) -> Result<Vec<AllocationRecord>, StoreError>;

    /// Returns the allocation records of one exam slot, ordered by room
    /// then seat.
    fn fetch_allocations_for_slot(
        &self,
        exam_slot: &ExamSlot,
    ) -> Result<Vec<AllocationRecord>, StoreError>;

    /// Returns the first allocation record of a student, if any.
    fn fetch_allocation_for_student(
        &self,
        student_id: &str,
    ) -> Result<Option<AllocationRecord>, StoreError>;

    /// Returns the admin warning trail in insertion order.
    fn fetch_warnings(&self) -> Result<Vec<AdminWarning>, StoreError>;
}

impl<T: RosterGateway + ?Sized> RosterGateway for &T {
    fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
        (**self).fetch_students()
    }

    fn fetch_rooms(&self) -> Result<Vec<Room>, StoreError> {
        (**self).fetch_rooms()
    }
}

impl<T: AllocationStore> AllocationStore for &T {
    type Transaction<'a>
        = T::Transaction<'a>
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        (**self).begin()
    }

    fn fetch_all_allocations(&self) -> Result<Vec<AllocationRecord>, StoreError> {
        (**self).fetch_all_allocations()
    }

    fn fetch_allocations_for_slot(
        &self,
        exam_slot: &ExamSlot,
    ) -> Result<Vec<AllocationRecord>, StoreError> {
        (**self).fetch_allocations_for_slot(exam_slot)
    }

    fn fetch_allocation_for_student(
        &self,
        student_id: &str,
    ) -> Result<Option<AllocationRecord>, StoreError> {
        (**self).fetch_allocation_for_student(student_id)
    }

    fn fetch_warnings(&self) -> Result<Vec<AdminWarning>, StoreError> {
        (**self).fetch_warnings()
    }
}
