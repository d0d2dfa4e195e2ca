//! seatplan Core - data model for exam seat allocation
//!
//! This crate provides the fundamental types shared by every seatplan crate:
//! - Roster and room inventory types read by the engine
//! - Allocation records and the append-only admin warning trail
//! - The warning taxonomy reported back to callers
//! - Error types

pub mod domain;
pub mod error;
pub mod warning;

pub use domain::{AdminWarning, AllocationRecord, ExamSlot, Room, Student};
pub use error::{Result, SeatPlanError};
pub use warning::{AllocationWarning, WarningCategory};
