//! Core state machine types.
//!
//! This module contains the pure pieces shared by every signal:
//! - The `State` trait and the three-phase `Phase` cycle
//! - Bounded, timestamped transition history

mod history;
mod state;

pub use history::{StateHistory, StateTransition, TransitionCause, DEFAULT_HISTORY_CAPACITY};
pub use state::{Phase, State, UnknownPhase};
