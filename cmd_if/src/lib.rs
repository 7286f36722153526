//! # Command interface library
//!
//! This crate defines the command and event types shared between the pitch
//! executive and anything that drives or observes it, such as the script
//! interpreter. It carries no I/O of its own.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cmd;
pub mod event;
pub mod pitch;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use cmd::PitchCmd;
pub use event::PitchEvent;
pub use pitch::{PitchType, ThrowHand};
