//! Errors raised by the control hierarchy.

use crate::timing::TimingError;
use thiserror::Error;

/// Errors that can occur when driving signals, intersections and systems.
///
/// Lookups that miss are not errors at this layer; they are silent no-ops.
/// The one exception is [`ControlError::UnknownIntersection`], returned by
/// `TrafficSystem::add_signal` as its failure indicator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("elapsed time must not be negative (got {elapsed})")]
    NegativeElapsed { elapsed: i64 },

    #[error("intersection '{id}' not found")]
    UnknownIntersection { id: String },

    #[error(transparent)]
    InvalidTiming(#[from] TimingError),
}
