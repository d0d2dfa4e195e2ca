//! Tests for branch balancing.

use super::*;

fn roster(branches: &[&str]) -> Vec<Student> {
    branches
        .iter()
        .enumerate()
        .map(|(i, branch)| Student::new(format!("S{:02}", i + 1), format!("n{}", i + 1), *branch))
        .collect()
}

fn ids(students: &[Student]) -> Vec<&str> {
    students.iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn test_seven_student_example_interleaves_fully() {
    let students = roster(&["CSE", "ECE", "EEE", "CSE", "ECE", "MECH", "CSE"]);
    let ordered = balance_by_branch(students);

    assert_eq!(ids(&ordered), ["S01", "S02", "S04", "S05", "S07", "S03", "S06"]);
    assert_eq!(adjacent_pairs(&ordered), 0);
}

#[test]
fn test_output_is_permutation() {
    let students = roster(&["A", "B", "A", "C", "A", "B", "D", "A", "C", "B", "A"]);
    let mut expected = ids(&students)
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    let ordered = balance_by_branch(students);
    let mut actual = ordered.iter().map(|s| s.id.clone()).collect::<Vec<_>>();

    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_within_branch_order_is_stable() {
    let students = roster(&["A", "A", "B", "A", "B"]);
    let ordered = balance_by_branch(students);
    let a_ids: Vec<_> = ordered
        .iter()
        .filter(|s| s.branch == "A")
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(a_ids, ["S01", "S02", "S04"]);
}

#[test]
fn test_tie_break_prefers_smaller_branch_name() {
    let students = roster(&["ZOO", "BIO", "ZOO", "BIO"]);
    let ordered = balance_by_branch(students);
    let branches: Vec<_> = ordered.iter().map(|s| s.branch.as_str()).collect();
    assert_eq!(branches, ["BIO", "ZOO", "BIO", "ZOO"]);
}

#[test]
fn test_single_branch_keeps_everyone() {
    let students = roster(&["CSE"; 5]);
    let ordered = balance_by_branch(students);
    assert_eq!(ordered.len(), 5);
    assert_eq!(adjacent_pairs(&ordered), 4);
}

#[test]
fn test_majority_branch_minimizes_collisions() {
    // A:4 B:1 cannot be fully separated.
    let students = roster(&["A", "A", "A", "A", "B"]);
    let ordered = balance_by_branch(students);
    let branches: Vec<_> = ordered.iter().map(|s| s.branch.as_str()).collect();
    assert_eq!(branches, ["A", "B", "A", "A", "A"]);
}

#[test]
fn test_empty_roster() {
    assert!(balance_by_branch(Vec::new()).is_empty());
    assert_eq!(detect_imbalance(&[]), None);
}

#[test]
fn test_detect_imbalance_threshold() {
    // 7 students: threshold is 7 / 2 + 1 = 4, so 5 triggers and 4 does not.
    let heavy = roster(&["A", "A", "A", "A", "A", "B", "C"]);
    assert_eq!(detect_imbalance(&heavy), Some(("A".to_string(), 5)));

    let borderline = roster(&["A", "A", "A", "A", "B", "C", "D"]);
    assert_eq!(detect_imbalance(&borderline), None);

    let single = roster(&["CSE"; 5]);
    assert_eq!(detect_imbalance(&single), Some(("CSE".to_string(), 5)));
}
