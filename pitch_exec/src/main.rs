//! Main pitch executive entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Command acquisition from the script source
//!         - Input polling (selection button levels)
//!         - Pitch manager processing:
//!             - Launch gating and reset scheduling
//!             - Trajectory control processing
//!             - Rigid body integration
//!         - Event notification and telemetry
//!
//! The loop runs at a fixed rate and sim time advances by exactly one period
//! per cycle, so a given script always produces the same flight.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use pitch_lib::{
    body::{self, RigidBody},
    data_store::DataStore,
    pitch_mgr::{GateState, PitchMgr},
};

mod cmd_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use nalgebra::Vector3;
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use cmd_if::event::PitchEvent;
use util::{
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

/// Script used when no script path is given on the command line: a slider
/// thrown left handed, launched two seconds in.
const DEMO_SCRIPT: &str = r#"
0.1: {"type": "POLL", "payload": {"grip": false, "trigger": true}};
0.5: {"type": "POLL", "payload": {"grip": false, "trigger": false}};
1.0: {"type": "HAND", "payload": "LEFT"};
2.0: {"type": "LAUNCH"};
"#;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "pitch_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Pitch Simulator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE SCRIPT SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // If we have a single argument use it as the script path, with no
    // arguments the built-in demo script is used instead
    let mut script = if args.len() == 2 {
        info!("Loading script from \"{}\"", &args[1]);

        ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?
    }
    else if args.len() == 1 {
        info!("No script provided, using the built-in demo script\n");

        ScriptInterpreter::from_str(DEMO_SCRIPT)
            .wrap_err("Failed to load the demo script")?
    }
    else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}", args.len() - 1)
        );
    };

    info!(
        "Loaded script lasts {:.02} s and contains {} commands\n",
        script.get_duration(),
        script.get_num_cmds()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // The ball starts at the world origin; its pose here becomes the origin
    // of every path
    let body_params: body::Params = util::params::load("body.toml")
        .wrap_err("Could not load body params")?;
    let ball = RigidBody::new(body_params);

    let mut pitch_mgr = PitchMgr::init("pitch_mgr.toml", Some(ball), &session)
        .wrap_err("Failed to initialise PitchMgr")?;
    info!("PitchMgr init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut script_finished = false;
    let mut num_flights: u64 = 0;
    let mut flight_trace: Vec<Vector3<f64>> = Vec::new();

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        ds.cycle_start(CYCLE_FREQUENCY_HZ, CYCLE_PERIOD_S);

        // ---- COMMAND PROCESSING ----

        match script.get_pending_cmds(ds.sim_time_s) {
            PendingCmds::None => (),
            PendingCmds::Some(cmd_vec) => {
                for cmd in cmd_vec.iter() {
                    cmd_processor::exec(&mut ds, &mut pitch_mgr, cmd);
                }
            }
            PendingCmds::EndOfScript => script_finished = true,
        }

        // ---- INPUT POLLING ----

        pitch_mgr.poll_input(ds.grip_held, ds.trigger_held);

        // ---- PITCH PROCESSING ----

        match pitch_mgr.tick(ds.sim_time_s, CYCLE_PERIOD_S) {
            Ok(()) => (),
            Err(e) => warn!("Error during PitchMgr processing: {}", e)
        }

        // Record the flight trace while the ball is in the air
        if pitch_mgr.gate() != GateState::Armed {
            flight_trace.push(pitch_mgr.body().position());
        }

        // ---- EVENTS ----

        for event in pitch_mgr.take_events() {
            info!("Event: {:?}", event);

            if let PitchEvent::Reset = event {
                // Save the completed flight's trace for offline plotting
                if !flight_trace.is_empty() {
                    session.save(
                        format!("flights/flight_{}.json", num_flights),
                        std::mem::take(&mut flight_trace)
                    );
                    num_flights += 1;
                }
            }
        }

        // ---- EXIT CONDITION ----

        // Stop once the script is exhausted and the ball is back in the
        // armed state, i.e. no flight is still in progress
        if script_finished && pitch_mgr.gate() == GateState::Armed {
            info!("End of command script reached, stopping");
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S)
            .checked_sub(cycle_dur)
        {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64()
                        - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    session.exit();

    Ok(())
}
