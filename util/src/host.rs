//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the pitch software.
///
/// The root is read from the `PITCH_SW_ROOT` environment variable, which must
/// be set before any executable is run. Parameter files and session
/// directories are resolved relative to this root.
pub fn get_pitch_sw_root() -> Result<PathBuf, std::env::VarError> {
    Ok(PathBuf::from(std::env::var("PITCH_SW_ROOT")?))
}
