//! Sequential identifier minting.

/// Mints human-readable ids: `I1, I2, …` for intersections and
/// `S1, S2, …` for signals.
///
/// Numbers are system-wide and never reused, even after removals.
#[derive(Debug, Clone, Default)]
pub struct IdMinter {
    intersections: u64,
    signals: u64,
}

impl IdMinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_intersection(&mut self) -> String {
        self.intersections += 1;
        format!("I{}", self.intersections)
    }

    pub fn next_signal(&mut self) -> String {
        self.signals += 1;
        format!("S{}", self.signals)
    }

    /// Intersection ids handed out so far.
    pub fn intersections_minted(&self) -> u64 {
        self.intersections
    }

    /// Signal ids handed out so far.
    pub fn signals_minted(&self) -> u64 {
        self.signals
    }
}
