//! Traffic Control: timed three-phase signals, intersections and a citywide
//! system, advanced by discrete logical ticks.
//!
//! # Core Concepts
//!
//! - **Signal**: a `RED -> GREEN -> YELLOW` state machine with a countdown and
//!   an enable flag
//! - **Intersection**: an owning group of signals with cascading enable and
//!   phase synchronization
//! - **TrafficSystem**: an owning group of intersections that mints ids and
//!   broadcasts enable and advance operations
//!
//! Time is logical. Nothing runs in the background; callers supply elapsed
//! increments explicitly.
//!
//! # Example
//!
//! ```rust
//! use traffic_control::{Phase, TrafficSystem};
//!
//! let mut system = TrafficSystem::new("city");
//! let main_st = system.create_intersection().id().to_string();
//! system.add_signal(&main_st, 30, 5, 30).unwrap();
//! system.add_signal(&main_st, 25, 5, 35).unwrap();
//!
//! // Only S1 runs out of red.
//! system.tick_signal(&main_st, "S1", 30).unwrap();
//! // Bring every signal of the intersection to S1's phase.
//! system.synchronize_intersection(&main_st);
//!
//! let status = system.status();
//! let phases: Vec<_> = status.intersections[0].signals.iter().map(|s| s.phase).collect();
//! assert_eq!(phases, vec![Phase::Green, Phase::Green]);
//! // Each signal reloads its own green duration.
//! assert_eq!(status.intersections[0].signals[1].remaining, 25);
//! ```

pub mod config;
pub mod control;
pub mod core;
pub mod status;
pub mod timing;

// Re-export commonly used types
pub use crate::config::{AdvanceMode, ControlConfig, ElapsedPolicy, SignalCountPolicy};
pub use crate::control::{ControlError, Intersection, Signal, TrafficSystem};
pub use crate::core::{Phase, State};
pub use crate::status::{IntersectionStatus, SignalStatus, SystemStatus};
pub use crate::timing::SignalTiming;
