//! Timing violations and the error that carries them.

use crate::core::Phase;
use thiserror::Error;

/// A single problem with one phase duration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimingViolation {
    #[error("{phase} duration must be positive")]
    ZeroDuration { phase: Phase },

    #[error("{phase} duration of {seconds}s exceeds the {max}s limit")]
    TooLong { phase: Phase, seconds: u32, max: u32 },
}

/// Rejected duration table, with every violation found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimingError {
    #[error("invalid signal timing ({} violation(s))", .0.len())]
    Invalid(Vec<TimingViolation>),
}

impl TimingError {
    pub fn violations(&self) -> &[TimingViolation] {
        match self {
            Self::Invalid(violations) => violations,
        }
    }
}
