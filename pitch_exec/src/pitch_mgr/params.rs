//! Pitch manager parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the pitch manager
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Delay between the ball reaching its final waypoint and the automatic
    /// return to the launch-ready state.
    ///
    /// Units: seconds
    pub reset_delay_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            reset_delay_s: 5.0,
        }
    }
}
