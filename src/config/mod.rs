//! Explicit, serializable configuration for a [`TrafficSystem`].
//!
//! The library never reads environment variables or files on its own. A
//! configuration is built in code with [`ControlConfigBuilder`] or parsed from
//! a JSON document supplied by the caller:
//!
//! ```rust
//! use traffic_control::config::{AdvanceMode, ControlConfig, ElapsedPolicy};
//!
//! let config = ControlConfig::from_json(
//!     r#"{
//!         "default_timing": { "green": 40, "yellow": 4, "red": 35 },
//!         "elapsed_policy": "clamp",
//!         "advance_mode": "decrement_then_sync"
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.elapsed_policy, ElapsedPolicy::Clamp);
//! assert_eq!(config.advance_mode, AdvanceMode::DecrementThenSync);
//! assert_eq!(config.history_capacity, 32);
//! ```
//!
//! [`TrafficSystem`]: crate::control::TrafficSystem

pub mod builder;
pub mod error;

pub use builder::ControlConfigBuilder;
pub use error::ConfigError;

use crate::control::ControlError;
use crate::core::DEFAULT_HISTORY_CAPACITY;
use crate::timing::SignalTiming;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest accepted per-signal history capacity.
pub const MAX_HISTORY_CAPACITY: usize = 4096;

/// What to do with a negative elapsed value at the system boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElapsedPolicy {
    /// Return [`ControlError::NegativeElapsed`].
    #[default]
    Reject,
    /// Treat negative elapsed as zero.
    Clamp,
}

impl ElapsedPolicy {
    /// Apply the policy, yielding a non-negative elapsed value.
    pub fn apply(self, elapsed: i64) -> Result<i64, ControlError> {
        if elapsed >= 0 {
            return Ok(elapsed);
        }
        match self {
            Self::Reject => Err(ControlError::NegativeElapsed { elapsed }),
            Self::Clamp => {
                warn!(elapsed, "negative elapsed clamped to zero");
                Ok(0)
            }
        }
    }
}

/// How `TrafficSystem::advance` treats its elapsed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceMode {
    /// Resynchronize enabled intersections without applying elapsed time.
    #[default]
    SyncOnly,
    /// Tick every signal of an enabled intersection, then resynchronize it.
    DecrementThenSync,
}

/// When `TrafficSystem::remove_signal` decrements the reported signal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCountPolicy {
    /// Whenever the intersection exists, even if the signal id did not.
    #[default]
    OnIntersectionFound,
    /// Only when a signal was actually removed.
    OnSignalRemoved,
}

/// Configuration carried by each traffic system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Durations for `TrafficSystem::add_default_signal`.
    pub default_timing: SignalTiming,
    pub elapsed_policy: ElapsedPolicy,
    pub advance_mode: AdvanceMode,
    pub signal_count_policy: SignalCountPolicy,
    /// Transitions each new signal retains; 0 disables history.
    pub history_capacity: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            default_timing: SignalTiming::DEFAULT,
            elapsed_policy: ElapsedPolicy::default(),
            advance_mode: AdvanceMode::default(),
            signal_count_policy: SignalCountPolicy::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ControlConfig {
    pub fn builder() -> ControlConfigBuilder {
        ControlConfigBuilder::new()
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check limits that the type system does not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryCapacityTooLarge {
                requested: self.history_capacity,
                max: MAX_HISTORY_CAPACITY,
            });
        }
        Ok(())
    }
}
