//! # Pitch selection types
//!
//! The pitch type and throw hand ride in command payloads and together
//! select which path the ball will follow.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The named shape of a pitch's path.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PitchType {
    Straight,
    Fork,
    Slider
}

/// The hand the pitch is thrown with.
///
/// The hand mirrors the lateral offsets of curve-breaking pitch types, and
/// has no effect on laterally symmetric ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThrowHand {
    Right,
    Left
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PitchType {
    fn default() -> Self {
        PitchType::Straight
    }
}

impl Default for ThrowHand {
    fn default() -> Self {
        ThrowHand::Right
    }
}
