//! Core State trait and the signal phase enumeration.
//!
//! States are plain values. Everything here is pure: a state describes a
//! position in a cycle and knows nothing about countdowns or owners.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use thiserror::Error;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transition history
/// - `PartialEq`: states are compared when synchronizing
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in status snapshots
///
/// # Example
///
/// ```rust
/// use traffic_control::core::{Phase, State};
///
/// assert_eq!(Phase::Green.name(), "GREEN");
/// assert!(!Phase::Red.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Color state of a single signal.
///
/// The cycle is fixed: `Red -> Green -> Yellow -> Red`. There is no
/// terminal phase.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Red,
    Green,
    Yellow,
}

impl Phase {
    /// Label rendered when no phase is available.
    ///
    /// No transition ever produces it; it exists for renderers that need a
    /// fallback for missing data.
    pub const UNKNOWN_LABEL: &'static str = "UNKNOWN";

    /// Phases in cycle order, starting from the initial phase.
    pub const CYCLE: [Phase; 3] = [Phase::Red, Phase::Green, Phase::Yellow];

    /// The phase that follows this one in the fixed cycle.
    ///
    /// ```rust
    /// use traffic_control::core::Phase;
    ///
    /// assert_eq!(Phase::Red.next(), Phase::Green);
    /// assert_eq!(Phase::Green.next(), Phase::Yellow);
    /// assert_eq!(Phase::Yellow.next(), Phase::Red);
    /// ```
    pub fn next(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Yellow,
            Self::Yellow => Self::Red,
        }
    }

    /// Stable uppercase label used in status snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
        }
    }

    /// Label for an optional phase, falling back to [`Phase::UNKNOWN_LABEL`].
    pub fn label(phase: Option<Phase>) -> &'static str {
        phase.map_or(Self::UNKNOWN_LABEL, |p| p.as_str())
    }
}

impl State for Phase {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label that does not name one of the three phases.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized phase label '{label}'")]
pub struct UnknownPhase {
    pub label: String,
}

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RED" => Ok(Self::Red),
            "GREEN" => Ok(Self::Green),
            "YELLOW" => Ok(Self::Yellow),
            other => Err(UnknownPhase {
                label: other.to_string(),
            }),
        }
    }
}
