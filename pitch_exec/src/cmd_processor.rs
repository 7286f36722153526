//! # Command processor module
//!
//! The command processor handles commands coming from any source (script or
//! built-in demo) and routes them into the pitch manager.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// Internal
use cmd_if::cmd::PitchCmd;
use pitch_lib::data_store::DataStore;
use pitch_lib::pitch_mgr::PitchMgr;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a command.
///
/// Level-state samples are held in the datastore and re-applied every input
/// tick; edge-triggered commands act on the manager immediately.
pub(crate) fn exec(ds: &mut DataStore, pitch_mgr: &mut PitchMgr, cmd: &PitchCmd) {

    // Handle different commands
    match cmd {
        PitchCmd::PollInput { grip, trigger } => {
            debug!("Recieved PollInput command: grip {}, trigger {}", grip, trigger);
            ds.grip_held = *grip;
            ds.trigger_held = *trigger;
        },
        PitchCmd::SelectHand(hand) => {
            debug!("Recieved SelectHand command: {:?}", hand);
            pitch_mgr.select_hand(*hand);
        },
        PitchCmd::Launch => {
            debug!("Recieved Launch command");
            pitch_mgr.launch();
        },
        PitchCmd::Reset => {
            debug!("Recieved Reset command");
            pitch_mgr.reset_now();
        }
    }

}
