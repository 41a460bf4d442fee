//! The citywide collection of intersections.

use crate::config::{AdvanceMode, ControlConfig, SignalCountPolicy};
use crate::control::{ControlError, IdMinter, Intersection, Signal};
use crate::core::Phase;
use crate::status::SystemStatus;
use crate::timing::SignalTiming;
use tracing::{debug, info, trace};

/// Owns every intersection and mints ids for new intersections and signals.
///
/// Dropping the system drops all intersections and their signals.
///
/// # Example
///
/// ```rust
/// use traffic_control::control::TrafficSystem;
/// use traffic_control::core::Phase;
///
/// let mut system = TrafficSystem::new("downtown");
/// let intersection_id = system.create_intersection().id().to_string();
/// assert_eq!(intersection_id, "I1");
///
/// let signal_id = system
///     .add_signal(&intersection_id, 30, 5, 30)
///     .unwrap()
///     .id()
///     .to_string();
/// assert_eq!(signal_id, "S1");
///
/// system.tick_signal(&intersection_id, &signal_id, 30).unwrap();
/// let status = system.status();
/// assert_eq!(status.intersections[0].signals[0].phase, Phase::Green);
/// ```
#[derive(Debug, Clone)]
pub struct TrafficSystem {
    id: String,
    enabled: bool,
    config: ControlConfig,
    ids: IdMinter,
    intersection_count: usize,
    signal_count: usize,
    intersections: Vec<Intersection>,
}

impl TrafficSystem {
    /// Create an empty, enabled system with the default configuration.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_config(id, ControlConfig::default())
    }

    pub fn with_config(id: impl Into<String>, config: ControlConfig) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            config,
            ids: IdMinter::new(),
            intersection_count: 0,
            signal_count: 0,
            intersections: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Reported intersection counter.
    ///
    /// Incremented on creation and decremented on removal; see
    /// [`TrafficSystem::signal_count`] for how the signal counter can drift
    /// from the live population.
    pub fn intersection_count(&self) -> usize {
        self.intersection_count
    }

    /// Reported signal counter.
    ///
    /// Removing an intersection leaves it unchanged, and under
    /// [`SignalCountPolicy::OnIntersectionFound`] removing an unknown signal
    /// from a known intersection still decrements it.
    pub fn signal_count(&self) -> usize {
        self.signal_count
    }

    /// Number of intersections currently owned.
    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    /// Owned intersections in creation order.
    pub fn intersections(&self) -> impl Iterator<Item = &Intersection> + '_ {
        self.intersections.iter()
    }

    pub fn intersection(&self, id: &str) -> Option<&Intersection> {
        self.intersections.iter().find(|i| i.id() == id)
    }

    pub fn intersection_mut(&mut self, id: &str) -> Option<&mut Intersection> {
        self.intersections.iter_mut().find(|i| i.id() == id)
    }

    /// Mint a fresh id and insert an empty, enabled intersection.
    pub fn create_intersection(&mut self) -> &mut Intersection {
        let id = self.ids.next_intersection();
        info!(system = %self.id, intersection = %id, "intersection created");
        let index = self.intersections.len();
        self.intersections.push(Intersection::new(id));
        self.intersection_count += 1;
        &mut self.intersections[index]
    }

    /// Remove and drop an intersection with all of its signals.
    ///
    /// Returns whether one was removed; unknown ids change nothing.
    pub fn remove_intersection(&mut self, id: &str) -> bool {
        let Some(index) = self.intersections.iter().position(|i| i.id() == id) else {
            trace!(system = %self.id, intersection = id, "remove of unknown intersection ignored");
            return false;
        };
        let removed = self.intersections.remove(index);
        self.intersection_count = self.intersection_count.saturating_sub(1);
        info!(
            system = %self.id,
            intersection = id,
            signals = removed.len(),
            "intersection removed"
        );
        true
    }

    /// Create a signal with the given durations inside `intersection_id`.
    ///
    /// Fails with [`ControlError::UnknownIntersection`] when the intersection
    /// does not exist, and with [`ControlError::InvalidTiming`] for a zero
    /// duration. Neither failure mints an id or touches the counters.
    pub fn add_signal(
        &mut self,
        intersection_id: &str,
        green: u32,
        yellow: u32,
        red: u32,
    ) -> Result<&mut Signal, ControlError> {
        let index = self.intersection_index(intersection_id)?;
        let timing = SignalTiming::new(green, yellow, red)?;
        Ok(self.insert_signal(index, timing))
    }

    /// Create a signal using the configured default durations.
    pub fn add_default_signal(&mut self, intersection_id: &str) -> Result<&mut Signal, ControlError> {
        let index = self.intersection_index(intersection_id)?;
        let timing = self.config.default_timing;
        Ok(self.insert_signal(index, timing))
    }

    /// Remove a signal from an intersection.
    ///
    /// How `signal_count` reacts is governed by
    /// [`ControlConfig::signal_count_policy`]. Returns whether a signal was
    /// actually removed.
    pub fn remove_signal(&mut self, intersection_id: &str, signal_id: &str) -> bool {
        let Some(intersection) = self.intersections.iter_mut().find(|i| i.id() == intersection_id)
        else {
            trace!(system = %self.id, intersection = intersection_id, "remove for unknown intersection ignored");
            return false;
        };
        let removed = intersection.remove_signal(signal_id);
        let decrement = match self.config.signal_count_policy {
            SignalCountPolicy::OnIntersectionFound => true,
            SignalCountPolicy::OnSignalRemoved => removed,
        };
        if decrement {
            self.signal_count = self.signal_count.saturating_sub(1);
        }
        if removed {
            info!(system = %self.id, intersection = intersection_id, signal = signal_id, "signal removed");
        }
        removed
    }

    /// Set the system flag and cascade it through every intersection to
    /// every signal.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        for intersection in &mut self.intersections {
            intersection.set_enabled(enabled);
        }
        debug!(system = %self.id, enabled, "enable cascaded");
    }

    /// System-wide tick.
    ///
    /// `elapsed` first passes through the configured
    /// [`ElapsedPolicy`](crate::config::ElapsedPolicy). Then, for every
    /// enabled intersection in creation order:
    ///
    /// - [`AdvanceMode::SyncOnly`] (default): the intersection is only
    ///   resynchronized; `elapsed` is accepted but not applied to any
    ///   countdown. Only [`TrafficSystem::tick_signal`] and
    ///   [`Intersection::tick_all`] decrement countdowns.
    /// - [`AdvanceMode::DecrementThenSync`]: every signal is ticked by
    ///   `elapsed`, then the intersection is resynchronized.
    ///
    /// Returns the number of intersections processed.
    pub fn advance(&mut self, elapsed: i64) -> Result<usize, ControlError> {
        let elapsed = self.config.elapsed_policy.apply(elapsed)?;
        let mode = self.config.advance_mode;
        let mut processed = 0;
        for intersection in self.intersections.iter_mut().filter(|i| i.is_enabled()) {
            if mode == AdvanceMode::DecrementThenSync {
                intersection.tick_all(elapsed)?;
            }
            intersection.synchronize();
            processed += 1;
        }
        debug!(system = %self.id, elapsed, ?mode, processed, "system advanced");
        Ok(processed)
    }

    /// Enable or disable one intersection. Returns whether it was found.
    pub fn set_intersection_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.intersection_mut(id) {
            Some(intersection) => {
                intersection.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Synchronize one intersection. Returns the shared phase, if any.
    pub fn synchronize_intersection(&mut self, id: &str) -> Option<Phase> {
        self.intersection_mut(id)?.synchronize()
    }

    /// Tick one signal, applying the configured elapsed policy.
    ///
    /// Unknown intersection or signal ids yield `Ok(None)`.
    pub fn tick_signal(
        &mut self,
        intersection_id: &str,
        signal_id: &str,
        elapsed: i64,
    ) -> Result<Option<Phase>, ControlError> {
        let elapsed = self.config.elapsed_policy.apply(elapsed)?;
        match self.intersection_mut(intersection_id) {
            Some(intersection) => intersection.tick_signal(signal_id, elapsed),
            None => Ok(None),
        }
    }

    /// Replace one signal's durations.
    ///
    /// Invalid durations are an error even when the ids are unknown.
    /// Returns whether the signal was found.
    pub fn configure_signal(
        &mut self,
        intersection_id: &str,
        signal_id: &str,
        green: u32,
        yellow: u32,
        red: u32,
    ) -> Result<bool, ControlError> {
        let timing = SignalTiming::new(green, yellow, red)?;
        Ok(self
            .intersection_mut(intersection_id)
            .is_some_and(|intersection| intersection.configure_signal(signal_id, timing)))
    }

    /// Emergency preemption for one signal. Returns whether it took effect.
    pub fn handle_emergency(&mut self, intersection_id: &str, signal_id: &str) -> bool {
        let handled = self
            .intersection_mut(intersection_id)
            .is_some_and(|intersection| intersection.handle_emergency(signal_id));
        if handled {
            info!(system = %self.id, intersection = intersection_id, signal = signal_id, "emergency preemption");
        }
        handled
    }

    /// Clear emergency preemption for one signal.
    pub fn clear_emergency(&mut self, intersection_id: &str, signal_id: &str) -> bool {
        self.intersection_mut(intersection_id)
            .is_some_and(|intersection| intersection.clear_emergency(signal_id))
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            id: self.id.clone(),
            enabled: self.enabled,
            intersection_count: self.intersection_count,
            signal_count: self.signal_count,
            intersections: self.intersections.iter().map(Intersection::status).collect(),
        }
    }

    fn intersection_index(&self, id: &str) -> Result<usize, ControlError> {
        self.intersections
            .iter()
            .position(|i| i.id() == id)
            .ok_or_else(|| ControlError::UnknownIntersection { id: id.to_string() })
    }

    fn insert_signal(&mut self, index: usize, timing: SignalTiming) -> &mut Signal {
        let intersection = &mut self.intersections[index];
        // Skip any number a caller already used by hand through intersection_mut.
        let signal_id = loop {
            let candidate = self.ids.next_signal();
            if intersection.signal(&candidate).is_none() {
                break candidate;
            }
        };
        info!(
            system = %self.id,
            intersection = %intersection.id(),
            signal = %signal_id,
            "signal created"
        );
        self.signal_count += 1;
        intersection.push_signal(Signal::with_history_capacity(
            signal_id,
            timing,
            self.config.history_capacity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ElapsedPolicy;

    fn system_with(config: ControlConfig) -> (TrafficSystem, String) {
        let mut system = TrafficSystem::with_config("city", config);
        let id = system.create_intersection().id().to_string();
        (system, id)
    }

    #[test]
    fn new_system_is_empty_and_enabled() {
        let system = TrafficSystem::new("city");
        assert_eq!(system.id(), "city");
        assert!(system.is_enabled());
        assert!(system.is_empty());
        assert_eq!(system.intersection_count(), 0);
        assert_eq!(system.signal_count(), 0);
    }

    #[test]
    fn create_intersection_mints_sequential_ids() {
        let mut system = TrafficSystem::new("city");
        assert_eq!(system.create_intersection().id(), "I1");
        assert_eq!(system.create_intersection().id(), "I2");
        assert_eq!(system.intersection_count(), 2);
        assert!(system.intersection("I2").unwrap().is_enabled());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut system = TrafficSystem::new("city");
        system.create_intersection();
        system.create_intersection();
        assert!(system.remove_intersection("I1"));

        assert_eq!(system.intersection_count(), 1);
        assert_eq!(system.create_intersection().id(), "I3");
        assert_eq!(system.len(), 2);
    }

    #[test]
    fn signal_ids_are_system_wide() {
        let mut system = TrafficSystem::new("city");
        let a = system.create_intersection().id().to_string();
        let b = system.create_intersection().id().to_string();

        assert_eq!(system.add_signal(&a, 30, 5, 30).unwrap().id(), "S1");
        assert_eq!(system.add_signal(&b, 30, 5, 30).unwrap().id(), "S2");
        assert_eq!(system.add_signal(&a, 30, 5, 30).unwrap().id(), "S3");
        assert_eq!(system.signal_count(), 3);
    }

    #[test]
    fn add_signal_to_unknown_intersection_fails() {
        let mut system = TrafficSystem::new("city");
        let err = system.add_signal("I7", 30, 5, 30).unwrap_err();
        assert_eq!(
            err,
            ControlError::UnknownIntersection {
                id: "I7".to_string()
            }
        );
        assert_eq!(system.signal_count(), 0);
    }

    #[test]
    fn add_signal_with_invalid_timing_fails_without_minting() {
        let (mut system, id) = system_with(ControlConfig::default());
        assert!(matches!(
            system.add_signal(&id, 30, 0, 30),
            Err(ControlError::InvalidTiming(_))
        ));
        assert_eq!(system.signal_count(), 0);
        assert_eq!(system.add_signal(&id, 30, 5, 30).unwrap().id(), "S1");
    }

    #[test]
    fn add_default_signal_uses_configured_timing() {
        let config = ControlConfig::builder()
            .default_timing(20, 3, 25)
            .build()
            .unwrap();
        let (mut system, id) = system_with(config);

        let signal = system.add_default_signal(&id).unwrap();
        assert_eq!(signal.timing(), SignalTiming::new(20, 3, 25).unwrap());
        assert_eq!(signal.remaining(), 25);
    }

    #[test]
    fn minted_signal_ids_skip_ids_added_by_hand() {
        let (mut system, id) = system_with(ControlConfig::default());
        system
            .intersection_mut(&id)
            .unwrap()
            .add_signal(Signal::new("S1", SignalTiming::DEFAULT));

        assert_eq!(system.add_signal(&id, 30, 5, 30).unwrap().id(), "S2");
        assert_eq!(system.intersection(&id).unwrap().len(), 2);
    }

    #[test]
    fn remove_signal_decrements_when_intersection_found() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert!(!system.remove_signal(&id, "S9"));
        assert_eq!(system.signal_count(), 1);
        assert_eq!(system.intersection(&id).unwrap().len(), 2);
    }

    #[test]
    fn remove_signal_with_strict_policy_only_counts_real_removals() {
        let config = ControlConfig::builder()
            .signal_count_policy(SignalCountPolicy::OnSignalRemoved)
            .build()
            .unwrap();
        let (mut system, id) = system_with(config);
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert!(!system.remove_signal(&id, "S9"));
        assert_eq!(system.signal_count(), 1);
        assert!(system.remove_signal(&id, "S1"));
        assert_eq!(system.signal_count(), 0);
    }

    #[test]
    fn unknown_intersection_removals_change_nothing() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert!(!system.remove_intersection("I9"));
        assert!(!system.remove_signal("I9", "S1"));
        assert_eq!(system.intersection_count(), 1);
        assert_eq!(system.signal_count(), 1);
    }

    #[test]
    fn counters_never_underflow() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.remove_signal(&id, "S1");
        system.remove_signal(&id, "S1");
        assert_eq!(system.signal_count(), 0);
    }

    #[test]
    fn removing_intersection_keeps_signal_count() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert!(system.remove_intersection(&id));
        assert_eq!(system.intersection_count(), 0);
        assert_eq!(system.signal_count(), 2);
        assert!(system.intersection(&id).is_none());
    }

    #[test]
    fn set_enabled_cascades_to_signals() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();
        system.create_intersection();

        system.set_enabled(false);
        assert!(!system.is_enabled());
        for intersection in system.intersections() {
            assert!(!intersection.is_enabled());
            assert!(intersection.signals().all(|s| !s.is_enabled()));
        }
    }

    #[test]
    fn advance_sync_only_leaves_countdowns_unapplied() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();
        system.add_signal(&id, 20, 4, 40).unwrap();
        system.tick_signal(&id, "S1", 10).unwrap();

        assert_eq!(system.advance(25).unwrap(), 1);

        let intersection = system.intersection(&id).unwrap();
        let s1 = intersection.signal("S1").unwrap();
        let s2 = intersection.signal("S2").unwrap();
        assert_eq!((s1.phase(), s1.remaining()), (Phase::Red, 30));
        assert_eq!((s2.phase(), s2.remaining()), (Phase::Red, 40));
    }

    #[test]
    fn advance_decrement_then_sync_applies_elapsed_first() {
        let config = ControlConfig::builder()
            .advance_mode(AdvanceMode::DecrementThenSync)
            .build()
            .unwrap();
        let (mut system, id) = system_with(config);
        system.add_signal(&id, 30, 5, 10).unwrap();
        system.add_signal(&id, 20, 4, 40).unwrap();

        assert_eq!(system.advance(10).unwrap(), 1);

        let intersection = system.intersection(&id).unwrap();
        let s1 = intersection.signal("S1").unwrap();
        let s2 = intersection.signal("S2").unwrap();
        // S1 ran out of red and became the green reference; S2 follows it.
        assert_eq!((s1.phase(), s1.remaining()), (Phase::Green, 30));
        assert_eq!((s2.phase(), s2.remaining()), (Phase::Green, 20));
    }

    #[test]
    fn advance_skips_disabled_intersections() {
        let (mut system, first) = system_with(ControlConfig::default());
        let second = system.create_intersection().id().to_string();
        system.add_signal(&first, 30, 5, 30).unwrap();
        system.add_signal(&second, 30, 5, 30).unwrap();
        system.tick_signal(&second, "S2", 5).unwrap();
        system.set_intersection_enabled(&second, false);

        assert_eq!(system.advance(1).unwrap(), 1);
        assert_eq!(
            system
                .intersection(&second)
                .unwrap()
                .signal("S2")
                .unwrap()
                .remaining(),
            25
        );
    }

    #[test]
    fn advance_rejects_negative_elapsed_by_default() {
        let (mut system, _) = system_with(ControlConfig::default());
        assert_eq!(
            system.advance(-1),
            Err(ControlError::NegativeElapsed { elapsed: -1 })
        );
    }

    #[test]
    fn clamp_policy_turns_negative_elapsed_into_zero() {
        let config = ControlConfig::builder()
            .elapsed_policy(ElapsedPolicy::Clamp)
            .build()
            .unwrap();
        let (mut system, id) = system_with(config);
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert_eq!(system.tick_signal(&id, "S1", -50).unwrap(), None);
        assert_eq!(
            system.intersection(&id).unwrap().signal("S1").unwrap().remaining(),
            30
        );
        assert_eq!(system.advance(-5).unwrap(), 1);
    }

    #[test]
    fn forwarders_ignore_unknown_ids() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert!(!system.set_intersection_enabled("I9", false));
        assert_eq!(system.synchronize_intersection("I9"), None);
        assert_eq!(system.tick_signal("I9", "S1", 30).unwrap(), None);
        assert_eq!(system.tick_signal(&id, "S9", 30).unwrap(), None);
        assert!(!system.configure_signal("I9", "S1", 10, 2, 10).unwrap());
        assert!(!system.handle_emergency(&id, "S9"));
        assert!(!system.clear_emergency("I9", "S1"));
    }

    #[test]
    fn configure_signal_validates_before_lookup() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert!(system.configure_signal("I9", "S1", 0, 2, 10).is_err());
        assert!(system.configure_signal(&id, "S1", 12, 2, 10).unwrap());
        assert_eq!(
            system.intersection(&id).unwrap().signal("S1").unwrap().remaining(),
            10
        );
    }

    #[test]
    fn synchronize_intersection_forwards() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();
        system.add_signal(&id, 30, 5, 30).unwrap();
        system.tick_signal(&id, "S1", 30).unwrap();

        assert_eq!(system.synchronize_intersection(&id), Some(Phase::Green));
        assert_eq!(
            system.intersection(&id).unwrap().signal("S2").unwrap().phase(),
            Phase::Green
        );
    }

    #[test]
    fn emergency_round_trip_through_system() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();

        assert!(system.handle_emergency(&id, "S1"));
        let status = system.status();
        assert!(status.intersections[0].signals[0].emergency);
        assert_eq!(status.intersections[0].signals[0].phase, Phase::Green);

        assert!(system.clear_emergency(&id, "S1"));
        assert!(!system.status().intersections[0].signals[0].emergency);
    }

    #[test]
    fn signals_inherit_history_capacity() {
        let config = ControlConfig::builder().history_capacity(0).build().unwrap();
        let (mut system, id) = system_with(config);
        let signal = system.add_signal(&id, 30, 5, 30).unwrap();
        signal.set_phase(Phase::Green);
        assert!(signal.history().is_empty());
    }

    #[test]
    fn status_aggregates_counters_and_intersections() {
        let (mut system, id) = system_with(ControlConfig::default());
        system.add_signal(&id, 30, 5, 30).unwrap();
        system.create_intersection();

        let status = system.status();
        assert_eq!(status.id, "city");
        assert!(status.enabled);
        assert_eq!(status.intersection_count, 2);
        assert_eq!(status.signal_count, 1);
        assert_eq!(status.intersections.len(), 2);
        assert_eq!(status.intersections[1].id, "I2");
        assert!(status.intersections[1].signals.is_empty());
    }
}
