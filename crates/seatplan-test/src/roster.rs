//! Roster and room builders.

use seatplan_core::{Room, Student};
use seatplan_store::MemoryStore;

/// Builds students from `(id, name, branch)` triples.
pub fn students(rows: &[(&str, &str, &str)]) -> Vec<Student> {
    rows.iter()
        .map(|(id, name, branch)| Student::new(*id, *name, *branch))
        .collect()
}

/// Builds one student per branch entry, with ids `S01`, `S02`, ...
pub fn by_branches(branches: &[&str]) -> Vec<Student> {
    branches
        .iter()
        .enumerate()
        .map(|(i, branch)| {
            Student::new(
                format!("S{:02}", i + 1),
                format!("Student {}", i + 1),
                *branch,
            )
        })
        .collect()
}

/// Seven students across four branches, two primary rooms of three seats
/// and one backup room of two.
pub fn seven_student_store() -> MemoryStore {
    MemoryStore::with_roster(
        students(&[
            ("S01", "Alice", "CSE"),
            ("S02", "Bob", "ECE"),
            ("S03", "Charlie", "EEE"),
            ("S04", "David", "CSE"),
            ("S05", "Eva", "ECE"),
            ("S06", "Frank", "MECH"),
            ("S07", "Grace", "CSE"),
        ]),
        vec![
            Room::primary("R1", 3),
            Room::primary("R2", 3),
            Room::backup("B1", 2),
        ],
    )
}

/// Five students of one branch in a single five-seat room.
pub fn single_branch_store() -> MemoryStore {
    MemoryStore::with_roster(by_branches(&["CSE"; 5]), vec![Room::primary("R1", 5)])
}
