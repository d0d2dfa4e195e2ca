//! seatplan - Exam seat allocation in Rust
//!
//! Seats every rostered student for an exam slot across primary and backup
//! rooms, spreads branches so classmates rarely sit side by side, and
//! commits the result atomically to an [`AllocationStore`].
//!
//! # Example
//!
//! ```
//! use seatplan::prelude::*;
//!
//! let store = MemoryStore::with_roster(
//!     vec![
//!         Student::new("S01", "Alice", "CSE"),
//!         Student::new("S02", "Bob", "ECE"),
//!         Student::new("S03", "Charlie", "CSE"),
//!     ],
//!     vec![Room::primary("R1", 3)],
//! );
//!
//! let result = seatplan::allocate(&store, "MATH-101");
//! assert!(result.success);
//! assert_eq!(store.fetch_allocations_for_slot(&"MATH-101".into()).unwrap().len(), 3);
//! ```

mod run;

#[cfg(feature = "console")]
pub mod console;

pub use run::{allocate, allocate_with_config, load_config, slot_report, CONFIG_FILE};

// Domain types
pub use seatplan_core::{
    AdminWarning, AllocationRecord, AllocationWarning, ExamSlot, Room, SeatPlanError, Student,
    WarningCategory,
};

// Configuration
pub use seatplan_config::{
    AllocationConfig, BalanceConfig, BalanceStrategy, CapacityConfig, ConfigError, RepairConfig,
};

// Storage
pub use seatplan_store::{
    AllocationStore, MemoryStore, RosterGateway, StoreError, StoreTransaction,
};

// Engine
pub use seatplan_engine::{AllocationResult, RunPhase, RunStats, SeatAllocator};

/// Re-exports for `use seatplan::prelude::*`.
pub mod prelude {
    pub use crate::{
        AllocationConfig, AllocationRecord, AllocationResult, AllocationStore, AllocationWarning,
        BalanceStrategy, ExamSlot, MemoryStore, Room, RosterGateway, RunPhase, SeatAllocator,
        Student,
    };
}
