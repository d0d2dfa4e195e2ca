//! Tests for the allocation transaction manager.

use super::*;
use seatplan_config::AllocationConfig;
use seatplan_core::Student;
use seatplan_store::{MemoryStore, RosterGateway};
use seatplan_test::{by_branches, seven_student_store, Fault, FaultyStore};

fn committed_for(store: &impl AllocationStore, slot: &str) -> usize {
    store
        .fetch_allocations_for_slot(&ExamSlot::new(slot))
        .unwrap()
        .len()
}

#[test]
fn test_backup_rooms_folded_in_for_seven_students() {
    let allocator = SeatAllocator::new(seven_student_store());
    let result = allocator.allocate_seats_for_exam("E1");

    assert!(result.success);
    assert_eq!(result.phase, RunPhase::Committed);
    assert_eq!(result.warnings, [AllocationWarning::BackupRoomsUsed]);
    assert_eq!(result.stats.rooms_used, 3);
    assert_eq!(result.stats.backup_rooms_used, 1);
    assert_eq!(result.stats.unresolved, 0);

    let audit: Vec<_> = allocator
        .store()
        .fetch_warnings()
        .unwrap()
        .into_iter()
        .map(|w| w.text)
        .collect();
    assert_eq!(audit, ["Backup rooms used for exam slot E1"]);
}

#[test]
fn test_store_failure_while_writing_rolls_back() {
    let store = FaultyStore::new(seven_student_store(), Fault::InsertBatch);
    store.set_fault(None);
    let allocator = SeatAllocator::new(store);
    assert!(allocator.allocate_seats_for_exam("E1").success);
    let audit_before = allocator.store().fetch_warnings().unwrap().len();

    allocator.store().set_fault(Some(Fault::InsertBatch));
    let result = allocator.allocate_seats_for_exam("E1");

    assert!(!result.success);
    assert_eq!(result.phase, RunPhase::RolledBack);
    assert!(result.allocations.is_empty());
    assert!(result.has_warning(|w| matches!(w, AllocationWarning::DatabaseError { .. })));
    assert!(result
        .warning_messages()
        .iter()
        .any(|m| m.starts_with("Database error during allocation")));

    // The earlier allocation and audit trail are untouched.
    assert_eq!(committed_for(allocator.store(), "E1"), 7);
    assert_eq!(allocator.store().fetch_warnings().unwrap().len(), audit_before);
}

#[test]
fn test_each_store_fault_fails_cleanly() {
    for fault in [
        Fault::Begin,
        Fault::FetchStudents,
        Fault::FetchRooms,
        Fault::ClearAllocations,
        Fault::InsertBatch,
        Fault::RecordWarning,
        Fault::Commit,
    ] {
        let allocator = SeatAllocator::new(FaultyStore::new(seven_student_store(), fault));
        let result = allocator.allocate_seats_for_exam("E1");

        assert!(!result.success, "{:?} should fail the run", fault);
        assert_eq!(result.phase, RunPhase::RolledBack, "{:?}", fault);
        assert!(result.allocations.is_empty());
        assert_eq!(committed_for(allocator.store(), "E1"), 0, "{:?}", fault);
        assert!(allocator.store().fetch_warnings().unwrap().is_empty());
    }
}

#[test]
fn test_shortfall_audit_survives_rollback() {
    let store = MemoryStore::with_roster(by_branches(&["A", "B", "C"]), vec![Room::primary("R1", 2)]);
    let allocator = SeatAllocator::new(store);
    let result = allocator.allocate_seats_for_exam("E1");

    assert!(!result.success);
    assert_eq!(result.phase, RunPhase::Failed);
    assert_eq!(
        result.warnings,
        [AllocationWarning::CapacityShortfall {
            students: 3,
            capacity: 2
        }]
    );
    let audit = allocator.store().fetch_warnings().unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].text, "Total students (3) exceed total capacity (2).");
}

#[test]
fn test_failed_audit_write_is_reported() {
    let store = FaultyStore::new(
        MemoryStore::with_roster(by_branches(&["A"]), Vec::new()),
        Fault::RecordWarning,
    );
    let allocator = SeatAllocator::new(store);
    let result = allocator.allocate_seats_for_exam("E1");

    assert_eq!(result.phase, RunPhase::Failed);
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0], AllocationWarning::NoRoomsAvailable);
    assert!(matches!(
        result.warnings[1],
        AllocationWarning::DatabaseError { .. }
    ));
}

#[test]
fn test_duplicate_student_ids_fail_planning() {
    let store = MemoryStore::with_roster(
        vec![
            Student::new("S01", "Alice", "CSE"),
            Student::new("S01", "Alicia", "ECE"),
        ],
        vec![Room::primary("R1", 4)],
    );
    let allocator = SeatAllocator::new(store);
    let result = allocator.allocate_seats_for_exam("E1");

    assert_eq!(result.phase, RunPhase::Failed);
    assert!(result.has_warning(|w| matches!(w, AllocationWarning::InvalidRoster { .. })));
}

#[test]
fn test_backup_disabled_by_config() {
    let config = AllocationConfig::new().with_backup_rooms(false);
    let allocator = SeatAllocator::with_config(seven_student_store(), config);
    let result = allocator.allocate_seats_for_exam("E1");

    assert!(!result.success);
    assert_eq!(
        result.warnings,
        [AllocationWarning::CapacityShortfall {
            students: 7,
            capacity: 6
        }]
    );
}

#[test]
fn test_repair_disabled_reports_every_pair() {
    let store = MemoryStore::with_roster(
        by_branches(&["A", "A", "B", "B"]),
        vec![Room::primary("R1", 2), Room::primary("R2", 2)],
    );
    let config = AllocationConfig::new()
        .with_balance_strategy(BalanceStrategy::RosterOrder)
        .with_repair(false);
    let allocator = SeatAllocator::with_config(store, config);
    let result = allocator.allocate_seats_for_exam("E1");

    assert!(result.success);
    assert_eq!(result.stats.swaps, 0);
    assert_eq!(result.stats.unresolved, 2);
    assert!(result.has_warning(|w| *w == AllocationWarning::UnresolvedAdjacency { count: 2 }));
}

#[test]
fn test_roster_order_with_repair_swaps_across_rooms() {
    let store = MemoryStore::with_roster(
        by_branches(&["A", "A", "B", "C"]),
        vec![Room::primary("R1", 2), Room::primary("R2", 2)],
    );
    let config = AllocationConfig::new().with_balance_strategy(BalanceStrategy::RosterOrder);
    let allocator = SeatAllocator::with_config(store, config);
    let result = allocator.allocate_seats_for_exam("E1");

    assert!(result.success);
    assert_eq!(result.stats.swaps, 1);
    assert!(result.warnings.is_empty());

    let moved = allocator.student_report("S02").unwrap();
    assert_eq!(moved.room_id, "R2");
    assert_eq!(moved.seat_no, 1);
}

#[test]
fn test_imbalance_warning_can_be_silenced() {
    let store = MemoryStore::with_roster(by_branches(&["A"; 4]), vec![Room::primary("R1", 4)]);
    let mut config = AllocationConfig::new();
    config.balance.imbalance_warning = false;
    let allocator = SeatAllocator::with_config(store, config);
    let result = allocator.allocate_seats_for_exam("E1");

    assert!(!result.has_warning(|w| matches!(w, AllocationWarning::BranchImbalance { .. })));
    assert_eq!(result.warnings, [AllocationWarning::UnresolvedAdjacency { count: 3 }]);
}

#[test]
fn test_reports_swallow_store_errors() {
    let allocator = SeatAllocator::new(seven_student_store());
    assert!(allocator.full_report().is_empty());
    assert!(allocator.student_report("S01").is_none());

    allocator.allocate_seats_for_exam("E1");
    let report = allocator.full_report();
    assert_eq!(report.len(), 7);
    assert_eq!(report[0].room_id, "B1");
    assert_eq!(allocator.student_report("S01").unwrap().room_id, "R1");
    assert_eq!(allocator.store().fetch_students().unwrap().len(), 7);
}

#[test]
fn test_invalid_config_fails_before_touching_store() {
    let store = seven_student_store();
    assert!(SeatAllocator::new(&store).allocate_seats_for_exam("E1").success);

    let config = AllocationConfig::new().with_max_swaps(0);
    let result = SeatAllocator::with_config(&store, config).allocate_seats_for_exam("E1");

    assert!(!result.success);
    assert_eq!(result.phase, RunPhase::Failed);
    assert_eq!(result.warnings.len(), 1);
    assert!(matches!(
        &result.warnings[0],
        AllocationWarning::InvalidConfiguration { reason } if reason.contains("max_swaps")
    ));
    assert_eq!(committed_for(&store, "E1"), 7);
}

#[test]
fn test_slot_locks_released_after_runs() {
    let allocator = Arc::new(SeatAllocator::new(seven_student_store()));

    let handles: Vec<_> = ["E1", "E1", "E2", "E1"]
        .into_iter()
        .map(|slot| {
            let allocator = Arc::clone(&allocator);
            std::thread::spawn(move || allocator.allocate_seats_for_exam(slot))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().success);
    }

    assert!(allocator.slot_locks.locks.lock().is_empty());
}

#[test]
fn test_seatless_room_rejected_as_invalid_roster() {
    let store = MemoryStore::with_roster(
        by_branches(&["A", "B"]),
        vec![Room::primary("R1", 2), Room::primary("R2", 0)],
    );
    let allocator = SeatAllocator::new(store);
    let result = allocator.allocate_seats_for_exam("E1");

    assert_eq!(result.phase, RunPhase::Failed);
    assert!(result.has_warning(
        |w| matches!(w, AllocationWarning::InvalidRoster { reason } if reason.contains("R2"))
    ));
    assert_eq!(committed_for(allocator.store(), "E1"), 0);
}
