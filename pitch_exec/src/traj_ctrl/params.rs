//! Trajectory control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory control
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// The speed the ball is driven towards along the path.
    ///
    /// Units: meters/second
    pub target_speed_ms: f64,

    /// Proportional gain converting velocity error into applied force.
    ///
    /// Units: newtons per meter/second of error
    pub steering_gain: f64,

    /// Distance below which the current target waypoint is considered
    /// reached.
    ///
    /// Units: meters
    pub arrival_threshold_m: f64,

    /// Speed below which the ball is considered stationary and no attitude
    /// demand is produced.
    ///
    /// Units: meters/second
    pub stationary_threshold_ms: f64,

    /// Gain on the attitude filter. The attitude is turned towards the
    /// velocity direction by a fraction of `orient_gain * dt` per step,
    /// saturated at 1.
    pub orient_gain: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            target_speed_ms: 120.0,
            steering_gain: 25.0,
            arrival_threshold_m: 2.0,
            stationary_threshold_ms: 0.1,
            orient_gain: 5.0,
        }
    }
}
