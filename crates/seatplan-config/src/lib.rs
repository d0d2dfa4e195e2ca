//! Configuration system for seatplan.
//!
//! Load allocation settings from TOML or YAML to control backup room usage,
//! roster balancing and adjacency repair without code changes. The defaults
//! reproduce the standard pipeline: backup rooms fold in on overflow, the
//! roster is interleaved by branch, and one repair pass runs unbounded.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use seatplan_config::{AllocationConfig, BalanceStrategy};
//!
//! let config = AllocationConfig::from_toml_str(r#"
//!     [capacity]
//!     use_backup_rooms = false
//!
//!     [balance]
//!     strategy = "roster_order"
//!
//!     [repair]
//!     max_swaps = 50
//! "#).unwrap();
//!
//! assert!(!config.capacity.use_backup_rooms);
//! assert_eq!(config.balance.strategy, BalanceStrategy::RosterOrder);
//! assert_eq!(config.repair.max_swaps, Some(50));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use seatplan_config::AllocationConfig;
//!
//! let config = AllocationConfig::load("seatplan.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use seatplan_core::SeatPlanError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SeatPlanError {
    fn from(err: ConfigError) -> Self {
        SeatPlanError::Config(err.to_string())
    }
}

/// Main allocation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AllocationConfig {
    /// Capacity planning configuration.
    #[serde(default)]
    pub capacity: CapacityConfig,

    /// Branch balancing configuration.
    #[serde(default)]
    pub balance: BalanceConfig,

    /// Adjacency repair configuration.
    #[serde(default)]
    pub repair: RepairConfig,
}

impl AllocationConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that parse but cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repair.enabled && self.repair.max_swaps == Some(0) {
            return Err(ConfigError::Invalid(
                "repair.max_swaps must be positive when repair is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Allows or forbids folding backup rooms in on overflow.
    pub fn with_backup_rooms(mut self, enabled: bool) -> Self {
        self.capacity.use_backup_rooms = enabled;
        self
    }

    /// Sets the roster ordering strategy.
    pub fn with_balance_strategy(mut self, strategy: BalanceStrategy) -> Self {
        self.balance.strategy = strategy;
        self
    }

    /// Enables or disables the adjacency repair pass.
    pub fn with_repair(mut self, enabled: bool) -> Self {
        self.repair.enabled = enabled;
        self
    }

    /// Bounds the number of swaps one repair pass may perform.
    pub fn with_max_swaps(mut self, max_swaps: usize) -> Self {
        self.repair.max_swaps = Some(max_swaps);
        self
    }
}

/// Capacity planning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CapacityConfig {
    /// Fold backup rooms in when primary capacity is insufficient.
    #[serde(default = "enabled")]
    pub use_backup_rooms: bool,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            use_backup_rooms: true,
        }
    }
}

/// Branch balancing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BalanceConfig {
    #[serde(default)]
    pub strategy: BalanceStrategy,

    /// Emit a warning when one branch is too large to interleave fully.
    #[serde(default = "enabled")]
    pub imbalance_warning: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            strategy: BalanceStrategy::default(),
            imbalance_warning: true,
        }
    }
}

/// Roster ordering strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStrategy {
    /// Greedy interleaving by remaining branch count.
    #[default]
    Interleave,

    /// Keep the roster in gateway order.
    RosterOrder,
}

/// Adjacency repair configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RepairConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,

    /// Maximum swaps per pass. Violations past the bound stay unresolved.
    #[serde(default)]
    pub max_swaps: Option<usize>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_swaps: None,
        }
    }
}

fn enabled() -> bool {
    true
}
