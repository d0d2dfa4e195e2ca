//! Capacity planning.
//!
//! Decides which rooms are usable for a run: primary rooms alone when they
//! can seat the roster, primary plus backup rooms on overflow, or failure
//! when even the combined inventory falls short.

use seatplan_config::CapacityConfig;
use seatplan_core::{AllocationWarning, Room};

/// Outcome of a successful capacity decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityPlan {
    /// Usable rooms: primary rooms first, then backup rooms, each by id.
    pub rooms: Vec<Room>,
    /// Total capacity of primary rooms.
    pub primary_capacity: u64,
    /// Total capacity of backup rooms considered by the plan.
    pub backup_capacity: u64,
    /// Set when backup rooms were folded in.
    pub warning: Option<AllocationWarning>,
}

impl CapacityPlan {
    /// Returns true if backup rooms are part of the usable set.
    pub fn uses_backup(&self) -> bool {
        self.warning.is_some()
    }

    /// Returns the number of seats across the usable rooms.
    pub fn usable_capacity(&self) -> u64 {
        total_capacity(&self.rooms)
    }
}

fn total_capacity<'a>(rooms: impl IntoIterator<Item = &'a Room>) -> u64 {
    rooms.into_iter().map(|r| u64::from(r.capacity)).sum()
}

/// Plans room usage for `students` examinees.
///
/// # Errors
///
/// Returns [`AllocationWarning::NoRoomsAvailable`] when no seat exists in the
/// usable room set, and [`AllocationWarning::CapacityShortfall`] when the
/// roster exceeds primary plus backup capacity.
pub fn plan_capacity(
    rooms: &[Room],
    students: usize,
    config: &CapacityConfig,
) -> Result<CapacityPlan, AllocationWarning> {
    let mut primary: Vec<Room> = rooms.iter().filter(|r| !r.is_backup).cloned().collect();
    let mut backup: Vec<Room> = if config.use_backup_rooms {
        rooms.iter().filter(|r| r.is_backup).cloned().collect()
    } else {
        Vec::new()
    };
    primary.sort_by(|a, b| a.id.cmp(&b.id));
    backup.sort_by(|a, b| a.id.cmp(&b.id));

    let primary_capacity = total_capacity(&primary);
    let backup_capacity = total_capacity(&backup);
    let demand = students as u64;

    if primary_capacity + backup_capacity == 0 {
        return Err(AllocationWarning::NoRoomsAvailable);
    }

    let plan = if demand <= primary_capacity {
        CapacityPlan {
            rooms: primary,
            primary_capacity,
            backup_capacity,
            warning: None,
        }
    } else if demand <= primary_capacity + backup_capacity {
        primary.extend(backup);
        CapacityPlan {
            rooms: primary,
            primary_capacity,
            backup_capacity,
            warning: Some(AllocationWarning::BackupRoomsUsed),
        }
    } else {
        return Err(AllocationWarning::CapacityShortfall {
            students,
            capacity: primary_capacity + backup_capacity,
        });
    };

    if plan.usable_capacity() == 0 {
        return Err(AllocationWarning::NoRoomsAvailable);
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> Vec<Room> {
        vec![
            Room::primary("R2", 3),
            Room::backup("B1", 2),
            Room::primary("R1", 3),
        ]
    }

    fn ids(plan: &CapacityPlan) -> Vec<&str> {
        plan.rooms.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_primary_only_when_it_fits() {
        let plan = plan_capacity(&inventory(), 6, &CapacityConfig::default()).unwrap();
        assert_eq!(ids(&plan), ["R1", "R2"]);
        assert!(!plan.uses_backup());
        assert_eq!(plan.primary_capacity, 6);
        assert_eq!(plan.backup_capacity, 2);
    }

    #[test]
    fn test_backup_folded_in_on_overflow() {
        let plan = plan_capacity(&inventory(), 7, &CapacityConfig::default()).unwrap();
        assert_eq!(ids(&plan), ["R1", "R2", "B1"]);
        assert_eq!(plan.warning, Some(AllocationWarning::BackupRoomsUsed));
        assert_eq!(plan.usable_capacity(), 8);
    }

    #[test]
    fn test_shortfall_reports_combined_capacity() {
        let err = plan_capacity(&inventory(), 9, &CapacityConfig::default()).unwrap_err();
        assert_eq!(
            err,
            AllocationWarning::CapacityShortfall {
                students: 9,
                capacity: 8
            }
        );
    }

    #[test]
    fn test_no_rooms_is_configuration_error() {
        let err = plan_capacity(&[], 3, &CapacityConfig::default()).unwrap_err();
        assert_eq!(err, AllocationWarning::NoRoomsAvailable);

        let zero = vec![Room::primary("R1", 0)];
        let err = plan_capacity(&zero, 0, &CapacityConfig::default()).unwrap_err();
        assert_eq!(err, AllocationWarning::NoRoomsAvailable);
    }

    #[test]
    fn test_backup_only_inventory_with_empty_roster() {
        let rooms = vec![Room::backup("B1", 4)];
        let err = plan_capacity(&rooms, 0, &CapacityConfig::default()).unwrap_err();
        assert_eq!(err, AllocationWarning::NoRoomsAvailable);

        let plan = plan_capacity(&rooms, 2, &CapacityConfig::default()).unwrap();
        assert!(plan.uses_backup());
    }

    #[test]
    fn test_backup_disabled_turns_overflow_into_shortfall() {
        let config = CapacityConfig {
            use_backup_rooms: false,
        };
        let err = plan_capacity(&inventory(), 7, &config).unwrap_err();
        assert_eq!(
            err,
            AllocationWarning::CapacityShortfall {
                students: 7,
                capacity: 6
            }
        );
    }
}
