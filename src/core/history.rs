//! State transition history tracking.
//!
//! Each signal keeps a bounded record of the phase changes it went through.
//! The bound keeps a long-running controller from growing without limit:
//! once full, the oldest record is dropped.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Number of transitions retained when no capacity is given.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// What triggered a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// The countdown ran out during a tick.
    Countdown,
    /// An explicit phase override.
    Override,
    /// Intersection-wide synchronization to a reference signal.
    Synchronize,
    /// A manual single-step advance.
    Manual,
    /// Emergency preemption forced the phase.
    Emergency,
    /// Full re-initialization.
    Reset,
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use traffic_control::core::{Phase, StateTransition, TransitionCause};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: Phase::Red,
///     to: Phase::Green,
///     cause: TransitionCause::Countdown,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, Phase::Green);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Why the transition happened
    pub cause: TransitionCause,
    /// Wall-clock time the transition was recorded
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use traffic_control::core::{Phase, StateHistory, StateTransition, TransitionCause};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(2);
/// for (from, to) in [(Phase::Red, Phase::Green), (Phase::Green, Phase::Yellow), (Phase::Yellow, Phase::Red)] {
///     history.record(StateTransition {
///         from,
///         to,
///         cause: TransitionCause::Countdown,
///         timestamp: Utc::now(),
///     });
/// }
///
/// // Only the two most recent transitions are kept.
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec![&Phase::Green, &Phase::Yellow, &Phase::Red]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    capacity: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history with [`DEFAULT_HISTORY_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history retaining at most `capacity` transitions.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition followed by
    /// the `to` state of every retained transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Wall-clock span between the oldest and newest retained transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &StateTransition<S>> + '_ {
        self.transitions.iter()
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
