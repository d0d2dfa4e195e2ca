//! Persistence errors.

use seatplan_core::SeatPlanError;
use thiserror::Error;

/// Error raised by a store or one of its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write would break a uniqueness or reference constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Any other backend failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for SeatPlanError {
    fn from(err: StoreError) -> Self {
        SeatPlanError::Store(err.to_string())
    }
}
