//! Admin warning audit trail entry.

use chrono::{DateTime, Utc};

/// A persisted admin warning.
///
/// Entries are append-only: the engine never updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdminWarning {
    /// Store-assigned sequence number, increasing in insertion order.
    pub id: u64,
    pub text: String,
    pub recorded_at: DateTime<Utc>,
}

impl AdminWarning {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            recorded_at: Utc::now(),
        }
    }
}
