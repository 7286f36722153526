//! # Trajectory control module
//!
//! Trajectory control is responsible for steering the ball along the
//! selected waypoint path at a controlled speed. Each physics step it aims
//! at the current target waypoint and produces a force demand from the
//! velocity error:
//!
//! `force = (direction_to_target * target_speed - velocity) * steering_gain`
//!
//! This is a proportional-only velocity controller: there is no integral or
//! derivative term, so a steady-state velocity error (for example from
//! gravity) is tolerated in exchange for simplicity and responsiveness.
//!
//! Alongside the force the module produces a filtered attitude demand which
//! turns the ball's nose into the velocity vector at a bounded rate, and it
//! advances the target index whenever the ball comes within the arrival
//! threshold of the current target. Arrival is tested by Euclidean distance
//! only. There is no time-based fallback, so a ball that orbits a target
//! without closing distance never advances.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TrajCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum TrajCtrlError {
    #[error("Processing was attempted with no path loaded")]
    NoPathLoaded,
}
