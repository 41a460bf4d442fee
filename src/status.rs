//! Read-only snapshots for external renderers.
//!
//! Snapshots are plain data: they hold no references into the live hierarchy
//! and can be serialized, diffed or printed however the caller likes. Phases
//! serialize as `"RED"`, `"GREEN"` or `"YELLOW"`.

use crate::core::Phase;
use crate::timing::SignalTiming;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalStatus {
    pub id: String,
    pub phase: Phase,
    pub remaining: u32,
    pub enabled: bool,
    pub emergency: bool,
    pub timing: SignalTiming,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionStatus {
    pub id: String,
    pub enabled: bool,
    pub signals: Vec<SignalStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub id: String,
    pub enabled: bool,
    pub intersection_count: usize,
    pub signal_count: usize,
    pub intersections: Vec<IntersectionStatus>,
}

impl SystemStatus {
    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Total signals across all intersections in this snapshot.
    pub fn live_signals(&self) -> usize {
        self.intersections.iter().map(|i| i.signals.len()).sum()
    }
}
