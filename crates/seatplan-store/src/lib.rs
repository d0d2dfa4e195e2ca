//! Persistence boundary for seatplan.
//!
//! The allocation engine never talks to a database directly. It reads the
//! roster through [`RosterGateway`] and writes through a [`StoreTransaction`]
//! obtained from [`AllocationStore::begin`]. Every mutation of one run goes
//! through the same transaction and becomes visible only on commit.
//!
//! [`MemoryStore`] is the in-process implementation used by tests and
//! embedders without a relational backend.

mod error;
mod memory;
mod traits;

pub use error::StoreError;
pub use memory::{MemoryStore, MemoryTransaction};
pub use traits::{AllocationStore, RosterGateway, StoreTransaction};
