//! Builder for constructing control configurations.

use crate::config::error::ConfigError;
use crate::config::{AdvanceMode, ControlConfig, ElapsedPolicy, SignalCountPolicy};
use crate::core::DEFAULT_HISTORY_CAPACITY;
use crate::timing::SignalTiming;

/// Builder for [`ControlConfig`] with a fluent API.
///
/// Durations are validated in [`ControlConfigBuilder::build`], so every
/// violation is reported in one place.
#[derive(Debug, Clone)]
pub struct ControlConfigBuilder {
    default_timing: (u32, u32, u32),
    elapsed_policy: ElapsedPolicy,
    advance_mode: AdvanceMode,
    signal_count_policy: SignalCountPolicy,
    history_capacity: usize,
}

impl ControlConfigBuilder {
    /// Create a builder preloaded with the defaults.
    pub fn new() -> Self {
        let timing = SignalTiming::DEFAULT;
        Self {
            default_timing: (timing.green(), timing.yellow(), timing.red()),
            elapsed_policy: ElapsedPolicy::default(),
            advance_mode: AdvanceMode::default(),
            signal_count_policy: SignalCountPolicy::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Durations used by `add_default_signal`.
    pub fn default_timing(mut self, green: u32, yellow: u32, red: u32) -> Self {
        self.default_timing = (green, yellow, red);
        self
    }

    pub fn elapsed_policy(mut self, policy: ElapsedPolicy) -> Self {
        self.elapsed_policy = policy;
        self
    }

    pub fn advance_mode(mut self, mode: AdvanceMode) -> Self {
        self.advance_mode = mode;
        self
    }

    pub fn signal_count_policy(mut self, policy: SignalCountPolicy) -> Self {
        self.signal_count_policy = policy;
        self
    }

    /// Transitions each new signal retains; 0 disables history.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the configuration.
    /// Returns an error for invalid durations or an oversized history.
    pub fn build(self) -> Result<ControlConfig, ConfigError> {
        let (green, yellow, red) = self.default_timing;
        let config = ControlConfig {
            default_timing: SignalTiming::new(green, yellow, red)?,
            elapsed_policy: self.elapsed_policy,
            advance_mode: self.advance_mode,
            signal_count_policy: self.signal_count_policy,
            history_capacity: self.history_capacity,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for ControlConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_HISTORY_CAPACITY;

    #[test]
    fn builder_defaults_match_config_defaults() {
        let config = ControlConfigBuilder::new().build().unwrap();
        assert_eq!(config, ControlConfig::default());
    }

    #[test]
    fn fluent_api_builds_config() {
        let config = ControlConfigBuilder::new()
            .default_timing(40, 4, 35)
            .elapsed_policy(ElapsedPolicy::Clamp)
            .advance_mode(AdvanceMode::DecrementThenSync)
            .signal_count_policy(SignalCountPolicy::OnSignalRemoved)
            .history_capacity(5)
            .build()
            .unwrap();

        assert_eq!(config.default_timing, SignalTiming::new(40, 4, 35).unwrap());
        assert_eq!(config.elapsed_policy, ElapsedPolicy::Clamp);
        assert_eq!(config.advance_mode, AdvanceMode::DecrementThenSync);
        assert_eq!(config.signal_count_policy, SignalCountPolicy::OnSignalRemoved);
        assert_eq!(config.history_capacity, 5);
    }

    #[test]
    fn builder_validates_timing() {
        let result = ControlConfigBuilder::new().default_timing(0, 0, 30).build();

        match result {
            Err(ConfigError::InvalidTiming(err)) => assert_eq!(err.violations().len(), 2),
            other => panic!("Expected InvalidTiming, got {other:?}"),
        }
    }

    #[test]
    fn builder_validates_history_capacity() {
        let result = ControlConfigBuilder::new()
            .history_capacity(MAX_HISTORY_CAPACITY + 1)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::HistoryCapacityTooLarge { .. })
        ));
    }
}
