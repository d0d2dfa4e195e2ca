//! Examinee record.

use std::fmt;

/// An examinee, as fetched from the roster gateway.
///
/// Immutable for the duration of an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Student {
    /// Unique roster identifier (roll number).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Affiliation group used as the fairness dimension.
    pub branch: String,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// Returns true if both students belong to the same branch.
    pub fn shares_branch(&self, other: &Student) -> bool {
        self.branch == other.branch
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.id, self.name, self.branch)
    }
}
