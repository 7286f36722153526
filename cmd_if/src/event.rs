//! # Event module
//!
//! Events are one-way notifications emitted by the pitch controller for
//! collaborators such as audio, scoring or debug visualisation. The
//! controller never queries those collaborators back.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::pitch::{PitchType, ThrowHand};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A notification of something the pitch controller has done.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PitchEvent {
    /// The pitch selection changed and the path was regenerated.
    Selected {
        pitch_type: PitchType,
        hand: ThrowHand
    },

    /// The ball was launched.
    Launched,

    /// The ball arrived at the final waypoint of its path.
    Arrived,

    /// The ball was returned to the launch-ready state.
    Reset
}
