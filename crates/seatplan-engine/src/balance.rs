//! Branch balancing.
//!
//! Reorders the roster so that consecutive students come from different
//! branches wherever the branch mix allows it. Each round pops the two
//! branches with the most students left and emits one student from each,
//! the greedy strategy used to reorganize a sequence without adjacent
//! duplicates.
//!
//! Ties on remaining count go to the lexicographically smaller branch, and
//! students within a branch keep their roster order, so the output is fully
//! determined by the input.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use seatplan_core::Student;

#[derive(Debug, PartialEq, Eq)]
struct BranchCount {
    remaining: usize,
    branch: String,
}

impl Ord for BranchCount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.branch.cmp(&self.branch))
    }
}

impl PartialOrd for BranchCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Interleaves `students` by branch.
///
/// The result is a permutation of the input.
///
/// # Example
///
/// ```
/// use seatplan_core::Student;
/// use seatplan_engine::balance::balance_by_branch;
///
/// let roster = vec![
///     Student::new("S1", "A", "CSE"),
///     Student::new("S2", "B", "CSE"),
///     Student::new("S3", "C", "ECE"),
/// ];
/// let branches: Vec<_> = balance_by_branch(roster)
///     .into_iter()
///     .map(|s| s.branch)
///     .collect();
/// assert_eq!(branches, ["CSE", "ECE", "CSE"]);
/// ```
pub fn balance_by_branch(students: Vec<Student>) -> Vec<Student> {
    let total = students.len();
    let mut queues: BTreeMap<String, VecDeque<Student>> = BTreeMap::new();
    for student in students {
        queues
            .entry(student.branch.clone())
            .or_default()
            .push_back(student);
    }

    let mut heap: BinaryHeap<BranchCount> = queues
        .iter()
        .map(|(branch, queue)| BranchCount {
            remaining: queue.len(),
            branch: branch.clone(),
        })
        .collect();

    let mut ordered = Vec::with_capacity(total);
    while let Some(first) = heap.pop() {
        let second = heap.pop();
        let mut staged = Vec::with_capacity(2);

        for mut entry in std::iter::once(first).chain(second) {
            if let Some(student) = queues.get_mut(&entry.branch).and_then(VecDeque::pop_front) {
                ordered.push(student);
            }
            entry.remaining -= 1;
            if entry.remaining > 0 {
                staged.push(entry);
            }
        }
        heap.extend(staged);
    }

    debug_assert_eq!(ordered.len(), total);
    ordered
}

/// Returns the dominant branch and its size when one branch holds more
/// than `N / 2 + 1` of `N` students.
///
/// Ties between equally large branches resolve to the smaller branch name.
pub fn detect_imbalance(students: &[Student]) -> Option<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for student in students {
        *counts.entry(student.branch.as_str()).or_default() += 1;
    }

    let (branch, count) = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))?;
    if count > students.len() / 2 + 1 {
        Some((branch.to_string(), count))
    } else {
        None
    }
}

/// Counts consecutive same-branch pairs in a sequence.
pub fn adjacent_pairs(students: &[Student]) -> usize {
    students
        .windows(2)
        .filter(|pair| pair[0].shares_branch(&pair[1]))
        .count()
}

#[cfg(test)]
mod tests;
