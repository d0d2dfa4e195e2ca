//! Error types for seatplan

use thiserror::Error;

/// Main error type for seatplan operations
#[derive(Debug, Error)]
pub enum SeatPlanError {
    /// Error in engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Roster or room inventory violates a data model invariant
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    /// Error reported by the persistence boundary
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias for seatplan operations
pub type Result<T> = std::result::Result<T, SeatPlanError>;
