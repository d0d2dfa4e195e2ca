//! Tests for the in-memory store.

use super::*;

fn seeded() -> MemoryStore {
    MemoryStore::with_roster(
        vec![
            Student::new("S02", "Bob", "ECE"),
            Student::new("S01", "Alice", "CSE"),
            Student::new("S03", "Carol", "EEE"),
        ],
        vec![
            Room::backup("B1", 2),
            Room::primary("R2", 3),
            Room::primary("R1", 3),
        ],
    )
}

fn record(student: &str, room: &str, seat: u32, slot: &str) -> AllocationRecord {
    AllocationRecord {
        student_id: student.to_string(),
        student_name: student.to_lowercase(),
        branch: "CSE".to_string(),
        room_id: room.to_string(),
        seat_no: seat,
        exam_slot: ExamSlot::new(slot),
    }
}

#[test]
fn test_gateway_ordering() {
    let store = seeded();

    let students: Vec<_> = store
        .fetch_students()
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(students, ["S01", "S02", "S03"]);

    let rooms: Vec<_> = store
        .fetch_rooms()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(rooms, ["R1", "R2", "B1"]);
}

#[test]
fn test_commit_makes_writes_visible() {
    let store = seeded();
    let mut tx = store.begin().unwrap();
    tx.insert_allocation_batch(&[record("S01", "R1", 1, "E1"), record("S02", "R1", 2, "E1")])
        .unwrap();
    tx.record_warning("first").unwrap();
    tx.record_warning("second").unwrap();

    assert!(store.fetch_all_allocations().unwrap().is_empty());
    tx.commit().unwrap();

    assert_eq!(store.fetch_all_allocations().unwrap().len(), 2);
    let warnings = store.fetch_warnings().unwrap();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].id, 1);
    assert_eq!(warnings[1].id, 2);
    assert_eq!(warnings[1].text, "second");
}

#[test]
fn test_rollback_discards_writes() {
    let store = seeded();
    let mut tx = store.begin().unwrap();
    tx.insert_allocation_batch(&[record("S01", "R1", 1, "E1")]).unwrap();
    tx.record_warning("discarded").unwrap();
    tx.rollback().unwrap();

    assert!(store.fetch_all_allocations().unwrap().is_empty());
    assert!(store.fetch_warnings().unwrap().is_empty());
}

#[test]
fn test_drop_without_commit_discards_writes() {
    let store = seeded();
    {
        let mut tx = store.begin().unwrap();
        tx.insert_allocation_batch(&[record("S01", "R1", 1, "E1")]).unwrap();
    }
    assert!(store.fetch_all_allocations().unwrap().is_empty());

    // The writer lock was released by the drop.
    let tx = store.begin().unwrap();
    tx.commit().unwrap();
}

#[test]
fn test_clear_is_scoped_to_slot() {
    let store = seeded();
    let mut tx = store.begin().unwrap();
    tx.insert_allocation_batch(&[
        record("S01", "R1", 1, "E1"),
        record("S02", "R1", 2, "E1"),
        record("S01", "R1", 1, "E2"),
    ])
    .unwrap();
    tx.commit().unwrap();

    let mut tx = store.begin().unwrap();
    assert_eq!(tx.clear_allocations(&ExamSlot::new("E1")).unwrap(), 2);
    tx.commit().unwrap();

    let remaining = store.fetch_all_allocations().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].exam_slot, ExamSlot::new("E2"));
}

#[test]
fn test_batch_rejects_duplicate_student_in_slot() {
    let store = seeded();
    let mut tx = store.begin().unwrap();
    let err = tx
        .insert_allocation_batch(&[record("S01", "R1", 1, "E1"), record("S01", "R2", 1, "E1")])
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));

    // Rejected batches leave nothing staged.
    tx.commit().unwrap();
    assert!(store.fetch_all_allocations().unwrap().is_empty());
}

#[test]
fn test_batch_rejects_taken_seat() {
    let store = seeded();
    let mut tx = store.begin().unwrap();
    let err = tx
        .insert_allocation_batch(&[record("S01", "R1", 1, "E1"), record("S02", "R1", 1, "E1")])
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(ref msg) if msg.contains("seat 1")));
}

#[test]
fn test_batch_rejects_unknown_references() {
    let store = seeded();
    let mut tx = store.begin().unwrap();
    assert!(tx
        .insert_allocation_batch(&[record("S99", "R1", 1, "E1")])
        .is_err());
    assert!(tx
        .insert_allocation_batch(&[record("S01", "R9", 1, "E1")])
        .is_err());
    assert!(tx
        .insert_allocation_batch(&[record("S01", "R1", 0, "E1")])
        .is_err());
}

#[test]
fn test_queries_order_by_room_then_seat() {
    let store = seeded();
    let mut tx = store.begin().unwrap();
    tx.insert_allocation_batch(&[
        record("S03", "R2", 1, "E1"),
        record("S02", "R1", 2, "E1"),
        record("S01", "R1", 1, "E1"),
    ])
    .unwrap();
    tx.commit().unwrap();

    let order: Vec<_> = store
        .fetch_allocations_for_slot(&ExamSlot::new("E1"))
        .unwrap()
        .into_iter()
        .map(|r| (r.room_id, r.seat_no))
        .collect();
    assert_eq!(
        order,
        [
            ("R1".to_string(), 1),
            ("R1".to_string(), 2),
            ("R2".to_string(), 1)
        ]
    );

    let found = store.fetch_allocation_for_student("S03").unwrap().unwrap();
    assert_eq!(found.room_id, "R2");
    assert!(store.fetch_allocation_for_student("S42").unwrap().is_none());
}

#[test]
fn test_warning_ids_continue_across_transactions() {
    let store = seeded();
    for text in ["a", "b"] {
        let mut tx = store.begin().unwrap();
        tx.record_warning(text).unwrap();
        tx.commit().unwrap();
    }
    let ids: Vec<_> = store.fetch_warnings().unwrap().iter().map(|w| w.id).collect();
    assert_eq!(ids, [1, 2]);
}

#[test]
fn test_seeding_helpers() {
    let store = MemoryStore::new();
    store.add_student(Student::new("S01", "Alice", "CSE"));
    store.add_room(Room::primary("R1", 1));
    assert_eq!(store.fetch_students().unwrap().len(), 1);
    assert_eq!(store.fetch_rooms().unwrap().len(), 1);
    assert!(format!("{:?}", store).contains("students: 1"));
}
