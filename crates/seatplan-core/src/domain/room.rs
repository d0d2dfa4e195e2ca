//! Room inventory and exam slot identifiers.

use std::fmt;

/// A physical exam room.
///
/// Backup rooms form the overflow pool and are only used when primary
/// capacity cannot seat the roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id: String,
    pub capacity: u32,
    pub is_backup: bool,
}

impl Room {
    /// Creates a primary room.
    pub fn primary(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            is_backup: false,
        }
    }

    /// Creates a backup (overflow) room.
    pub fn backup(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            is_backup: true,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_backup { "backup " } else { "" };
        write!(f, "{}room {} ({} seats)", kind, self.id, self.capacity)
    }
}

/// Partition key for allocations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExamSlot(String);

impl ExamSlot {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExamSlot {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ExamSlot {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ExamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
