//! Pitch selection state
//!
//! Two level-triggered buttons (grip and trigger) resolve into one of three
//! pitch types. The resolution is applied only as a transition, i.e. only
//! when the resolved type differs from the current one, so holding a
//! combination down does not re-select every tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use cmd_if::pitch::{PitchType, ThrowHand};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pitch selection.
#[derive(Debug, Default, Copy, Clone)]
pub struct SelectionState {
    pitch_type: PitchType,
    hand: ThrowHand,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SelectionState {
    /// Resolve the two button levels into a pitch type.
    ///
    /// Neither button held resolves to `None`, meaning "leave the current
    /// selection alone".
    pub fn resolve(grip_held: bool, trigger_held: bool) -> Option<PitchType> {
        match (grip_held, trigger_held) {
            (true, true) => Some(PitchType::Fork),
            (true, false) => Some(PitchType::Straight),
            (false, true) => Some(PitchType::Slider),
            (false, false) => None,
        }
    }

    /// Apply a sample of the button levels to the selection.
    ///
    /// Returns the newly selected type if, and only if, this sample changed
    /// the selection. Holding a combination across many samples changes the
    /// selection exactly once.
    pub fn apply_levels(
        &mut self,
        grip_held: bool,
        trigger_held: bool
    ) -> Option<PitchType> {
        match Self::resolve(grip_held, trigger_held) {
            Some(resolved) if resolved != self.pitch_type => {
                self.pitch_type = resolved;
                Some(resolved)
            }
            _ => None,
        }
    }

    /// Set the pitch type directly. Returns true if the selection changed.
    pub fn set_pitch_type(&mut self, pitch_type: PitchType) -> bool {
        if self.pitch_type != pitch_type {
            self.pitch_type = pitch_type;
            true
        }
        else {
            false
        }
    }

    /// Set the throwing hand. Returns true if the selection changed.
    pub fn set_hand(&mut self, hand: ThrowHand) -> bool {
        if self.hand != hand {
            self.hand = hand;
            true
        }
        else {
            false
        }
    }

    pub fn pitch_type(&self) -> PitchType {
        self.pitch_type
    }

    pub fn hand(&self) -> ThrowHand {
        self.hand
    }
}
