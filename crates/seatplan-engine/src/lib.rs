//! seatplan Engine
//!
//! This crate provides the exam seat allocation pipeline:
//! - Capacity planning over primary and backup rooms
//! - Branch balancing of the roster
//! - Sequential seat assignment
//! - Single-pass adjacency repair
//! - The transactional allocation entry point

pub mod allocator;
pub mod assign;
pub mod balance;
pub mod capacity;
pub mod resolve;
pub mod result;
pub mod scope;
pub mod stats;

pub use allocator::SeatAllocator;
pub use assign::assign_seats;
pub use balance::{balance_by_branch, detect_imbalance};
pub use capacity::{plan_capacity, CapacityPlan};
pub use resolve::{count_violations, resolve_adjacency, Resolution};
pub use result::AllocationResult;
pub use scope::{RunPhase, RunScope};
pub use stats::RunStats;
