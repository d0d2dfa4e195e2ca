//! Allocation entry point and transaction manager.
//!
//! [`SeatAllocator::allocate_seats_for_exam`] runs the whole pipeline inside
//! one store transaction:
//!
//! 1. fetch the roster and rooms, plan capacity
//! 2. balance the roster by branch
//! 3. assign seats room by room
//! 4. repair same-branch adjacency
//! 5. replace the slot's allocations, write audit notes, commit
//!
//! Planning failures roll the transaction back and record their audit note
//! in a separate write, so the slot's existing allocations survive while
//! the audit trail still shows the failure. Store failures roll back and
//! surface as a database warning.
//!
//! Logging levels:
//! - **INFO**: Run start/end, per-stage summaries
//! - **DEBUG**: Phase transitions, store commits
//! - **TRACE**: Individual swaps
//! - **ERROR**: Store failures

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use seatplan_config::{AllocationConfig, BalanceStrategy, ConfigError};
use seatplan_core::domain::validate_inventory;
use seatplan_core::{AllocationRecord, AllocationWarning, ExamSlot, Room, SeatPlanError};
use seatplan_store::{AllocationStore, StoreError, StoreTransaction};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::assign::assign_seats;
use crate::balance::{balance_by_branch, detect_imbalance};
use crate::capacity::plan_capacity;
use crate::resolve::{count_violations, resolve_adjacency, Resolution};
use crate::result::AllocationResult;
use crate::scope::{RunPhase, RunScope};

/// Why a run stopped before committing.
#[derive(Debug)]
enum RunError {
    /// Capacity or inventory problem found while planning.
    Planning(AllocationWarning),
    /// The store failed.
    Store(StoreError),
}

impl From<StoreError> for RunError {
    fn from(err: StoreError) -> Self {
        RunError::Store(err)
    }
}

/// One lock per exam slot in flight, so runs for the same slot never
/// interleave. Entries live only while some run holds or waits on them.
#[derive(Debug, Default)]
struct SlotLocks {
    locks: Mutex<HashMap<ExamSlot, Arc<Mutex<()>>>>,
}

impl SlotLocks {
    fn acquire(&self, exam_slot: &ExamSlot) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().entry(exam_slot.clone()).or_default())
    }

    /// Hands back a lock from [`acquire`](Self::acquire), dropping the map
    /// entry when no other run references it.
    fn release(&self, exam_slot: &ExamSlot, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();
        // the map's reference plus ours
        if Arc::strong_count(&lock) == 2 {
            locks.remove(exam_slot);
        }
    }
}

/// Seats examinees for exam slots against an [`AllocationStore`].
///
/// # Example
///
/// ```
/// use seatplan_core::{Room, Student};
/// use seatplan_engine::SeatAllocator;
/// use seatplan_store::MemoryStore;
///
/// let store = MemoryStore::with_roster(
///     vec![
///         Student::new("S01", "Alice", "CSE"),
///         Student::new("S02", "Bob", "ECE"),
///     ],
///     vec![Room::primary("R1", 2)],
/// );
/// let allocator = SeatAllocator::new(store);
///
/// let result = allocator.allocate_seats_for_exam("E1");
/// assert!(result.success);
/// assert_eq!(result.allocations.len(), 2);
/// assert!(result.warnings.is_empty());
/// ```
#[derive(Debug)]
pub struct SeatAllocator<St> {
    store: St,
    config: AllocationConfig,
    slot_locks: SlotLocks,
}

impl<St: AllocationStore> SeatAllocator<St> {
    /// Creates an allocator with the default configuration.
    pub fn new(store: St) -> Self {
        Self::with_config(store, AllocationConfig::default())
    }

    /// Creates an allocator with a custom configuration.
    ///
    /// The configuration is validated at the start of every run; an invalid
    /// one fails the run with [`AllocationWarning::InvalidConfiguration`]
    /// before the store is touched.
    pub fn with_config(store: St, config: AllocationConfig) -> Self {
        Self {
            store,
            config,
            slot_locks: SlotLocks::default(),
        }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Allocates seats for every rostered student for `exam_slot`.
    ///
    /// Replaces any allocation previously committed for the slot. Never
    /// fails with an error: every failure is reported through the returned
    /// result's success flag and warnings.
    pub fn allocate_seats_for_exam(&self, exam_slot: impl Into<ExamSlot>) -> AllocationResult {
        let exam_slot = exam_slot.into();
        let slot_lock = self.slot_locks.acquire(&exam_slot);
        let result = {
            let _serialized = slot_lock.lock();
            self.run(exam_slot.clone())
        };
        self.slot_locks.release(&exam_slot, slot_lock);
        result
    }

    fn run(&self, exam_slot: ExamSlot) -> AllocationResult {
        let mut scope = RunScope::new(exam_slot.clone());
        info!(event = "allocation_start", exam_slot = %exam_slot);

        let allocations = match self.execute(&mut scope) {
            Ok(records) => {
                scope.advance(RunPhase::Committed);
                info!(
                    event = "allocation_committed",
                    exam_slot = %exam_slot,
                    students = scope.stats().students,
                    rooms_used = scope.stats().rooms_used,
                    swaps = scope.stats().swaps,
                    unresolved = scope.stats().unresolved,
                    warnings = scope.warnings().len(),
                    elapsed_ms = scope.stats().elapsed().as_millis() as u64,
                );
                records
            }
            Err(RunError::Planning(warning)) => {
                scope.warn(warning.clone());
                scope.advance(RunPhase::Failed);
                self.record_failure_audit(&mut scope, &warning);
                info!(event = "allocation_failed", exam_slot = %exam_slot, reason = %warning);
                Vec::new()
            }
            Err(RunError::Store(err)) => {
                error!(event = "allocation_rolled_back", exam_slot = %exam_slot, error = %err);
                scope.warn(AllocationWarning::DatabaseError {
                    message: err.to_string(),
                });
                scope.advance(RunPhase::RolledBack);
                Vec::new()
            }
        };

        let (phase, warnings, stats) = scope.into_parts();
        AllocationResult {
            success: phase == RunPhase::Committed,
            warnings,
            allocations,
            phase,
            stats,
        }
    }

    /// Opens the run transaction and settles it: commit on success,
    /// rollback on any error.
    fn execute(&self, scope: &mut RunScope) -> Result<Vec<AllocationRecord>, RunError> {
        self.config.validate().map_err(|err| {
            let reason = match err {
                ConfigError::Invalid(reason) => reason,
                other => other.to_string(),
            };
            RunError::Planning(AllocationWarning::InvalidConfiguration { reason })
        })?;

        let mut tx = self.store.begin()?;
        match self.pipeline(&mut tx, scope) {
            Ok(records) => {
                tx.commit()?;
                Ok(records)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback() {
                    error!(
                        event = "rollback_failed",
                        exam_slot = %scope.exam_slot(),
                        error = %rollback,
                    );
                }
                Err(err)
            }
        }
    }

    fn pipeline<T: StoreTransaction>(
        &self,
        tx: &mut T,
        scope: &mut RunScope,
    ) -> Result<Vec<AllocationRecord>, RunError> {
        let students = tx.fetch_students()?;
        let rooms = tx.fetch_rooms()?;
        scope.stats_mut().students = students.len();

        validate_inventory(&students, &rooms).map_err(|err| match err {
            SeatPlanError::InvalidRoster(reason) => {
                RunError::Planning(AllocationWarning::InvalidRoster { reason })
            }
            other => RunError::Planning(AllocationWarning::InvalidRoster {
                reason: other.to_string(),
            }),
        })?;

        let plan = plan_capacity(&rooms, students.len(), &self.config.capacity)
            .map_err(RunError::Planning)?;
        info!(
            event = "capacity_planned",
            exam_slot = %scope.exam_slot(),
            students = students.len(),
            primary_capacity = plan.primary_capacity,
            backup_capacity = plan.backup_capacity,
            uses_backup = plan.uses_backup(),
        );
        if let Some(warning) = plan.warning.clone() {
            scope.warn(warning);
        }

        scope.advance(RunPhase::Balancing);
        if self.config.balance.imbalance_warning {
            if let Some((branch, count)) = detect_imbalance(&students) {
                scope.warn(AllocationWarning::BranchImbalance {
                    branch,
                    count,
                    students: students.len(),
                });
            }
        }
        let ordered = match self.config.balance.strategy {
            BalanceStrategy::Interleave => balance_by_branch(students),
            BalanceStrategy::RosterOrder => students,
        };
        info!(
            event = "roster_balanced",
            exam_slot = %scope.exam_slot(),
            strategy = ?self.config.balance.strategy,
            adjacent_pairs = crate::balance::adjacent_pairs(&ordered),
        );

        scope.advance(RunPhase::Assigning);
        let assigned = assign_seats(&ordered, &plan.rooms, scope.exam_slot());
        info!(
            event = "seats_assigned",
            exam_slot = %scope.exam_slot(),
            seated = assigned.len(),
        );

        scope.advance(RunPhase::Resolving);
        let resolution = if self.config.repair.enabled {
            resolve_adjacency(assigned, self.config.repair.max_swaps)
        } else {
            let pairs = count_violations(&assigned);
            Resolution {
                records: assigned,
                violations_found: pairs,
                swaps: 0,
                unresolved: pairs,
            }
        };
        let records = resolution.records;
        {
            let stats = scope.stats_mut();
            stats.record_repair(
                resolution.violations_found,
                resolution.swaps,
                resolution.unresolved,
            );
            stats.residual_pairs = count_violations(&records);
            let (used, backup) = rooms_used(&records, &plan.rooms);
            stats.rooms_used = used;
            stats.backup_rooms_used = backup;
        }
        info!(
            event = "adjacency_resolved",
            exam_slot = %scope.exam_slot(),
            violations = resolution.violations_found,
            swaps = resolution.swaps,
            unresolved = resolution.unresolved,
        );
        if resolution.unresolved > 0 {
            scope.warn(AllocationWarning::UnresolvedAdjacency {
                count: resolution.unresolved,
            });
        }

        scope.advance(RunPhase::Persisting);
        let cleared = tx.clear_allocations(scope.exam_slot())?;
        tx.insert_allocation_batch(&records)?;
        for text in scope.audit_texts() {
            tx.record_warning(&text)?;
        }
        info!(
            event = "allocations_written",
            exam_slot = %scope.exam_slot(),
            cleared,
            inserted = records.len(),
        );
        Ok(records)
    }

    /// Appends the audit note of a planning failure in its own transaction.
    fn record_failure_audit(&self, scope: &mut RunScope, warning: &AllocationWarning) {
        let Some(text) = warning.audit_text(scope.exam_slot()) else {
            return;
        };
        let written = self.store.begin().and_then(|mut tx| {
            tx.record_warning(&text)?;
            tx.commit()
        });
        if let Err(err) = written {
            error!(
                event = "audit_write_failed",
                exam_slot = %scope.exam_slot(),
                error = %err,
            );
            scope.warn(AllocationWarning::DatabaseError {
                message: err.to_string(),
            });
        }
    }

    /// Returns every committed allocation, ordered by room then seat.
    ///
    /// Store failures are logged and yield an empty report.
    pub fn full_report(&self) -> Vec<AllocationRecord> {
        self.store.fetch_all_allocations().unwrap_or_else(|err| {
            error!(event = "report_failed", error = %err);
            Vec::new()
        })
    }

    /// Returns the committed allocation of one student, if any.
    ///
    /// Store failures are logged and yield `None`.
    pub fn student_report(&self, student_id: &str) -> Option<AllocationRecord> {
        self.store
            .fetch_allocation_for_student(student_id)
            .unwrap_or_else(|err| {
                error!(event = "report_failed", student_id, error = %err);
                None
            })
    }
}

impl<St: AllocationStore + 'static> SeatAllocator<St> {
    /// Runs an allocation on the blocking thread pool.
    ///
    /// Must be called from within a Tokio runtime. Runs for the same slot
    /// still execute one at a time.
    pub fn spawn_allocation(
        self: &Arc<Self>,
        exam_slot: impl Into<ExamSlot>,
    ) -> JoinHandle<AllocationResult> {
        let allocator = Arc::clone(self);
        let exam_slot = exam_slot.into();
        tokio::task::spawn_blocking(move || allocator.allocate_seats_for_exam(exam_slot))
    }
}

fn rooms_used(records: &[AllocationRecord], rooms: &[Room]) -> (usize, usize) {
    let used: HashSet<&str> = records.iter().map(|r| r.room_id.as_str()).collect();
    let backup = rooms
        .iter()
        .filter(|r| r.is_backup && used.contains(r.id.as_str()))
        .count();
    (used.len(), backup)
}

#[cfg(test)]
mod tests;
