//! A single timed three-phase signal.

use crate::control::ControlError;
use crate::core::{
    Phase, StateHistory, StateTransition, TransitionCause, DEFAULT_HISTORY_CAPACITY,
};
use crate::status::SignalStatus;
use crate::timing::SignalTiming;
use chrono::Utc;
use tracing::{debug, trace, warn};

/// Timed state machine cycling `Red -> Green -> Yellow -> Red`.
///
/// A new signal starts at `Red` with the red countdown loaded and is enabled.
/// While disabled, ticks are ignored but explicit overrides still apply.
///
/// # Example
///
/// ```rust
/// use traffic_control::control::Signal;
/// use traffic_control::core::Phase;
/// use traffic_control::timing::SignalTiming;
///
/// let mut signal = Signal::new("S1", SignalTiming::new(30, 5, 30).unwrap());
///
/// signal.tick(10).unwrap();
/// assert_eq!((signal.phase(), signal.remaining()), (Phase::Red, 20));
///
/// // Exhausting the countdown advances exactly one phase.
/// assert_eq!(signal.tick(1000).unwrap(), Some(Phase::Green));
/// assert_eq!(signal.remaining(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct Signal {
    id: String,
    phase: Phase,
    remaining: u32,
    timing: SignalTiming,
    enabled: bool,
    emergency: bool,
    history: StateHistory<Phase>,
}

impl Signal {
    pub fn new(id: impl Into<String>, timing: SignalTiming) -> Self {
        Self::with_history_capacity(id, timing, DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a signal whose history retains at most `capacity` transitions.
    pub fn with_history_capacity(
        id: impl Into<String>,
        timing: SignalTiming,
        capacity: usize,
    ) -> Self {
        Self {
            id: id.into(),
            phase: Phase::Red,
            remaining: timing.red(),
            timing,
            enabled: true,
            emergency: false,
            history: StateHistory::with_capacity(capacity),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds (or ticks) left in the current phase.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn timing(&self) -> SignalTiming {
        self.timing
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether an emergency preemption is active.
    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn history(&self) -> &StateHistory<Phase> {
        &self.history
    }

    /// Jump to `phase` and reload its countdown, regardless of `enabled`.
    pub fn set_phase(&mut self, phase: Phase) {
        self.enter(phase, TransitionCause::Override);
    }

    pub(crate) fn synchronize_to(&mut self, phase: Phase) {
        self.enter(phase, TransitionCause::Synchronize);
    }

    /// Advance logical time by `elapsed`.
    ///
    /// Negative input is rejected and leaves the signal untouched, even
    /// when disabled. A disabled signal otherwise ignores the tick. When
    /// `elapsed` reaches or passes the countdown, the signal advances exactly
    /// one phase however large the overrun; the excess is discarded.
    ///
    /// Returns the phase entered, if any.
    pub fn tick(&mut self, elapsed: i64) -> Result<Option<Phase>, ControlError> {
        if elapsed < 0 {
            warn!(signal = %self.id, elapsed, "rejected negative elapsed time");
            return Err(ControlError::NegativeElapsed { elapsed });
        }
        if !self.enabled {
            trace!(signal = %self.id, elapsed, "tick ignored, signal disabled");
            return Ok(None);
        }

        if i64::from(self.remaining) > elapsed {
            // elapsed < remaining, so it fits in u32
            self.remaining -= elapsed as u32;
            trace!(signal = %self.id, remaining = self.remaining, "countdown");
            return Ok(None);
        }

        self.remaining = 0;
        let next = self.phase.next();
        self.enter(next, TransitionCause::Countdown);
        Ok(Some(next))
    }

    /// Replace the duration table and reload the current phase's countdown.
    pub fn configure(&mut self, timing: SignalTiming) {
        self.timing = timing;
        self.remaining = timing.duration(self.phase);
        debug!(
            signal = %self.id,
            green = timing.green(),
            yellow = timing.yellow(),
            red = timing.red(),
            "signal reconfigured"
        );
    }

    /// Toggle tick-driven transitions. Phase and countdown are unchanged.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Full re-initialization: `Red`, red countdown, enabled, no emergency.
    pub fn reset(&mut self) {
        self.enter(Phase::Red, TransitionCause::Reset);
        self.enabled = true;
        self.emergency = false;
    }

    /// Step to the next phase in the cycle immediately.
    ///
    /// No-op while disabled. Returns the phase entered.
    pub fn advance_phase(&mut self) -> Option<Phase> {
        if !self.enabled {
            return None;
        }
        let next = self.phase.next();
        self.enter(next, TransitionCause::Manual);
        Some(next)
    }

    /// Force `Green` for an approaching emergency vehicle.
    ///
    /// No-op while disabled. Returns whether the preemption took effect.
    pub fn handle_emergency(&mut self) -> bool {
        if !self.enabled {
            warn!(signal = %self.id, "emergency ignored, signal disabled");
            return false;
        }
        self.emergency = true;
        self.enter(Phase::Green, TransitionCause::Emergency);
        true
    }

    /// Lower the emergency flag. The current phase keeps running.
    ///
    /// Returns whether an emergency was active.
    pub fn clear_emergency(&mut self) -> bool {
        std::mem::replace(&mut self.emergency, false)
    }

    pub fn status(&self) -> SignalStatus {
        SignalStatus {
            id: self.id.clone(),
            phase: self.phase,
            remaining: self.remaining,
            enabled: self.enabled,
            emergency: self.emergency,
            timing: self.timing,
        }
    }

    fn enter(&mut self, phase: Phase, cause: TransitionCause) {
        let from = self.phase;
        self.phase = phase;
        self.remaining = self.timing.duration(phase);
        self.history.record(StateTransition {
            from,
            to: phase,
            cause,
            timestamp: Utc::now(),
        });
        debug!(signal = %self.id, %from, to = %phase, ?cause, "phase changed");
    }
}
