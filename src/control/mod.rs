//! The control hierarchy: signals, intersections and the traffic system.
//!
//! Control flows strictly downward. A [`TrafficSystem`] dispatches to an
//! [`Intersection`] by id, which dispatches to a [`Signal`] by id. No child
//! knows its parent, and each entity has exactly one owner, so dropping the
//! system drops the whole tree.
//!
//! Everything here is synchronous and call-driven: time only moves when a
//! caller passes an elapsed value to a tick. To drive the hierarchy from
//! several timers, put it behind a single lock (or give each intersection a
//! single owning task) so ticks, overrides and reconfiguration on a signal
//! are serialized.

mod error;
mod ids;
mod intersection;
mod signal;
mod system;

pub use error::ControlError;
pub use ids::IdMinter;
pub use intersection::Intersection;
pub use signal::Signal;
pub use system::TrafficSystem;
