//! Per-signal phase duration tables.
//!
//! A [`SignalTiming`] can only be obtained through validation, so a signal
//! never holds a zero duration. A zero dwell would make every tick exhaust
//! the countdown and hide the intended phase length.
//!
//! Validation accumulates every violation instead of stopping at the first:
//!
//! ```rust
//! use traffic_control::timing::{SignalTiming, TimingViolation};
//! use traffic_control::core::Phase;
//!
//! let err = SignalTiming::new(0, 5, 0).unwrap_err();
//! assert_eq!(
//!     err.violations(),
//!     &[
//!         TimingViolation::ZeroDuration { phase: Phase::Green },
//!         TimingViolation::ZeroDuration { phase: Phase::Red },
//!     ]
//! );
//! ```

pub mod violations;

pub use violations::{TimingError, TimingViolation};

use crate::core::Phase;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Upper bound for any single phase: one day.
pub const MAX_PHASE_SECONDS: u32 = 86_400;

type TimingValidation = Validation<(), NonEmptyVec<TimingViolation>>;

/// Validated `{green, yellow, red}` durations in seconds (or ticks).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTiming", into = "RawTiming")]
pub struct SignalTiming {
    green: u32,
    yellow: u32,
    red: u32,
}

impl SignalTiming {
    /// Green 30, yellow 5, red 30.
    pub const DEFAULT: SignalTiming = SignalTiming {
        green: 30,
        yellow: 5,
        red: 30,
    };

    /// Validate and build a duration table.
    pub fn new(green: u32, yellow: u32, red: u32) -> Result<Self, TimingError> {
        match validate(green, yellow, red) {
            Validation::Success(_) => Ok(Self { green, yellow, red }),
            Validation::Failure(violations) => Err(TimingError::Invalid(
                violations.iter().cloned().collect(),
            )),
        }
    }

    pub fn green(&self) -> u32 {
        self.green
    }

    pub fn yellow(&self) -> u32 {
        self.yellow
    }

    pub fn red(&self) -> u32 {
        self.red
    }

    /// Configured dwell for `phase`.
    pub fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Red => self.red,
            Phase::Green => self.green,
            Phase::Yellow => self.yellow,
        }
    }

    /// Length of one full `Red -> Green -> Yellow` cycle.
    pub fn cycle_length(&self) -> u64 {
        u64::from(self.green) + u64::from(self.yellow) + u64::from(self.red)
    }
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_phase(phase: Phase, seconds: u32) -> TimingValidation {
    if seconds == 0 {
        Validation::fail(TimingViolation::ZeroDuration { phase })
    } else if seconds > MAX_PHASE_SECONDS {
        Validation::fail(TimingViolation::TooLong {
            phase,
            seconds,
            max: MAX_PHASE_SECONDS,
        })
    } else {
        Validation::success(())
    }
}

/// Check all three durations, accumulating every violation.
pub fn validate(green: u32, yellow: u32, red: u32) -> TimingValidation {
    let checks = vec![
        check_phase(Phase::Green, green),
        check_phase(Phase::Yellow, yellow),
        check_phase(Phase::Red, red),
    ];
    Validation::all_vec(checks).map(|_| ())
}

/// Unvalidated wire form of [`SignalTiming`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawTiming {
    green: u32,
    yellow: u32,
    red: u32,
}

impl TryFrom<RawTiming> for SignalTiming {
    type Error = TimingError;

    fn try_from(raw: RawTiming) -> Result<Self, Self::Error> {
        SignalTiming::new(raw.green, raw.yellow, raw.red)
    }
}

impl From<SignalTiming> for RawTiming {
    fn from(timing: SignalTiming) -> Self {
        RawTiming {
            green: timing.green,
            yellow: timing.yellow,
            red: timing.red,
        }
    }
}
