//! One-call helpers over [`SeatAllocator`].

use std::io;
use std::path::Path;

use seatplan_config::{AllocationConfig, ConfigError};
use seatplan_core::{AllocationRecord, ExamSlot, Result};
use seatplan_engine::{AllocationResult, SeatAllocator};
use seatplan_store::AllocationStore;
use tracing::warn;

/// Configuration file picked up by [`allocate`] from the working directory.
pub const CONFIG_FILE: &str = "seatplan.toml";

/// Loads an allocation configuration, TOML or YAML by extension.
pub fn load_config(path: impl AsRef<Path>) -> Result<AllocationConfig> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => AllocationConfig::from_yaml_file(path)?,
        _ => AllocationConfig::from_toml_file(path)?,
    };
    Ok(config)
}

/// Allocates seats for `exam_slot`.
///
/// Reads [`CONFIG_FILE`] when present and falls back to defaults otherwise.
/// A file that exists but cannot be used is logged and ignored.
/// With the `console` feature, console output is initialized first.
pub fn allocate<St: AllocationStore>(
    store: St,
    exam_slot: impl Into<ExamSlot>,
) -> AllocationResult {
    allocate_with_config(store, exam_slot, config_or_default(CONFIG_FILE))
}

/// Loads `path`, falling back to defaults. A missing file is expected; any
/// other failure is logged before the defaults are used.
pub(crate) fn config_or_default(path: impl AsRef<Path>) -> AllocationConfig {
    match AllocationConfig::load(path.as_ref()) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            AllocationConfig::default()
        }
        Err(err) => {
            warn!(
                event = "config_ignored",
                path = %path.as_ref().display(),
                error = %err,
            );
            AllocationConfig::default()
        }
    }
}

/// Allocates seats for `exam_slot` with an explicit configuration.
pub fn allocate_with_config<St: AllocationStore>(
    store: St,
    exam_slot: impl Into<ExamSlot>,
    config: AllocationConfig,
) -> AllocationResult {
    #[cfg(feature = "console")]
    crate::console::init();

    SeatAllocator::with_config(store, config).allocate_seats_for_exam(exam_slot)
}

/// Committed allocations for one exam slot, ordered by room and seat.
pub fn slot_report<St: AllocationStore>(
    store: &St,
    exam_slot: impl Into<ExamSlot>,
) -> Result<Vec<AllocationRecord>> {
    Ok(store.fetch_allocations_for_slot(&exam_slot.into())?)
}
