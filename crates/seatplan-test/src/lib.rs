//! Shared test fixtures for seatplan crates.
//!
//! - [`roster`] - student and room builders plus the reference scenarios
//! - [`faulty`] - a store that fails on demand
//! - [`concurrent`] - a store that lets transactions overlap and counts them
//! - [`invariants`] - checks every committed seating must satisfy
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! seatplan-test = { workspace = true }
//! ```

pub mod concurrent;
pub mod faulty;
pub mod invariants;
pub mod roster;

pub use concurrent::{ConcurrentStore, ConcurrentTransaction};
pub use faulty::{Fault, FaultyStore};
pub use invariants::check_seating;
pub use roster::{by_branches, seven_student_store, single_branch_store, students};
