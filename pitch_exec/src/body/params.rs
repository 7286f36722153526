//! Rigid body parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the rigid body
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Mass of the body
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Magnitude of the gravitational acceleration, applied along world Y-.
    ///
    /// Units: meters/second^2
    pub gravity_mss: f64,

    /// If false the body is in free space and gravity is not applied.
    pub use_gravity: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            mass_kg: 1.0,
            gravity_mss: 9.81,
            use_gravity: true,
        }
    }
}
