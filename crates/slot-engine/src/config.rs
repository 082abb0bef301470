//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! booking page's standard behaviour: 15-minute slots, a two-month horizon,
//! and no slots offered while the calendar provider is failing.
//!
//! ```toml
//! slot_step_minutes = 15
//! horizon_months = 2
//! failure_policy = "fail_safe"
//! parallel_threshold = 1024
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resolver::DEFAULT_PARALLEL_THRESHOLD;

/// What to do when the busy-interval provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Treat the owner as fully busy: no slots are offered.
    #[default]
    FailSafe,
    /// Treat the owner as fully free: only the schedule constrains slots.
    FailOpen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Spacing between candidate start times.
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: u32,
    /// How far ahead the booking page offers slots.
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Candidate count from which resolution runs in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_slot_step_minutes() -> u32 {
    15
}

fn default_horizon_months() -> u32 {
    2
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_step_minutes: default_slot_step_minutes(),
            horizon_months: default_horizon_months(),
            failure_policy: FailurePolicy::default(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_step_minutes == 0 {
            return Err(ConfigError::Invalid(
                "slot_step_minutes must be greater than zero".to_string(),
            ));
        }
        if self.slot_step_minutes > 24 * 60 {
            return Err(ConfigError::Invalid(format!(
                "slot_step_minutes must be at most one day, got {}",
                self.slot_step_minutes
            )));
        }
        Ok(())
    }
}
