//! A named group of signals.

use crate::control::{ControlError, Signal};
use crate::core::Phase;
use crate::status::{IntersectionStatus, SignalStatus};
use crate::timing::SignalTiming;
use tracing::{debug, trace};

/// Owns a set of signals with distinct ids.
///
/// Signals keep their insertion order; the first one added is the reference
/// for [`Intersection::synchronize`]. Lookups by an unknown id are silent
/// no-ops.
#[derive(Debug, Clone)]
pub struct Intersection {
    id: String,
    enabled: bool,
    signals: Vec<Signal>,
}

impl Intersection {
    /// Create an empty, enabled intersection.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            signals: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Owned signals in insertion order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> + '_ {
        self.signals.iter()
    }

    pub fn signal(&self, id: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.id() == id)
    }

    pub fn signal_mut(&mut self, id: &str) -> Option<&mut Signal> {
        self.signals.iter_mut().find(|s| s.id() == id)
    }

    /// Insert `signal` unless one with the same id is already present.
    ///
    /// A duplicate is dropped; the existing signal is kept as is. Returns
    /// whether the signal was inserted.
    pub fn add_signal(&mut self, signal: Signal) -> bool {
        if self.signal(signal.id()).is_some() {
            trace!(intersection = %self.id, signal = %signal.id(), "duplicate signal ignored");
            return false;
        }
        self.push_signal(signal);
        true
    }

    /// Append a signal whose id the caller has checked to be fresh.
    pub(crate) fn push_signal(&mut self, signal: Signal) -> &mut Signal {
        let index = self.signals.len();
        self.signals.push(signal);
        &mut self.signals[index]
    }

    /// Remove and drop the signal with `id`. Returns whether one was removed.
    pub fn remove_signal(&mut self, id: &str) -> bool {
        match self.signals.iter().position(|s| s.id() == id) {
            Some(index) => {
                self.signals.remove(index);
                true
            }
            None => {
                trace!(intersection = %self.id, signal = id, "remove of unknown signal ignored");
                false
            }
        }
    }

    /// Set this intersection's flag and cascade it to every signal.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        for signal in &mut self.signals {
            signal.set_enabled(enabled);
        }
        debug!(intersection = %self.id, enabled, signals = self.signals.len(), "enable cascaded");
    }

    /// Forward a tick to one signal. Unknown ids yield `Ok(None)`.
    pub fn tick_signal(&mut self, id: &str, elapsed: i64) -> Result<Option<Phase>, ControlError> {
        match self.signal_mut(id) {
            Some(signal) => signal.tick(elapsed),
            None => {
                trace!(intersection = %self.id, signal = id, "tick for unknown signal ignored");
                Ok(None)
            }
        }
    }

    /// Tick every owned signal by `elapsed`.
    ///
    /// Negative input is rejected before any signal is touched. Returns the
    /// number of signals that changed phase.
    pub fn tick_all(&mut self, elapsed: i64) -> Result<usize, ControlError> {
        if elapsed < 0 {
            return Err(ControlError::NegativeElapsed { elapsed });
        }
        let mut advanced = 0;
        for signal in &mut self.signals {
            if signal.tick(elapsed)?.is_some() {
                advanced += 1;
            }
        }
        Ok(advanced)
    }

    /// Put every signal into the first signal's phase.
    ///
    /// Each signal reloads the countdown from its own duration table, so
    /// `remaining` may differ afterwards. Returns the shared phase, or `None`
    /// for an empty intersection.
    pub fn synchronize(&mut self) -> Option<Phase> {
        let reference = self.signals.first()?.phase();
        for signal in &mut self.signals {
            signal.synchronize_to(reference);
        }
        debug!(intersection = %self.id, phase = %reference, "signals synchronized");
        Some(reference)
    }

    /// Replace one signal's duration table. Returns whether it was found.
    pub fn configure_signal(&mut self, id: &str, timing: SignalTiming) -> bool {
        match self.signal_mut(id) {
            Some(signal) => {
                signal.configure(timing);
                true
            }
            None => false,
        }
    }

    /// Trigger emergency preemption on one signal.
    pub fn handle_emergency(&mut self, id: &str) -> bool {
        self.signal_mut(id)
            .is_some_and(|signal| signal.handle_emergency())
    }

    /// Clear emergency preemption on one signal.
    pub fn clear_emergency(&mut self, id: &str) -> bool {
        self.signal_mut(id)
            .is_some_and(|signal| signal.clear_emergency())
    }

    /// Lazily produced per-signal snapshots, in insertion order.
    pub fn signal_statuses(&self) -> impl Iterator<Item = SignalStatus> + '_ {
        self.signals.iter().map(Signal::status)
    }

    pub fn status(&self) -> IntersectionStatus {
        IntersectionStatus {
            id: self.id.clone(),
            enabled: self.enabled,
            signals: self.signal_statuses().collect(),
        }
    }
}
