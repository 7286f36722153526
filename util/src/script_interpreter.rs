//! # Pitch script interpreter module
//!
//! This module provides an interpreter for pitch command scripts, allowing
//! command sequences to be played back against the executive's sim time.
//!
//! Scripts are plain text files in which each line has the format
//! `<time_s>: <command json>;`, for example:
//!
//! ```text
//! 0.5: {"type": "POLL", "payload": {"grip": true, "trigger": false}};
//! 2.0: {"type": "LAUNCH"};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use cmd_if::cmd::{CmdParseError, PitchCmd};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
pub struct Command {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The command to run
    cmd: PitchCmd
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_cmds` to acquire a list of commands that need executing.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCmd(f64, CmdParseError)
}

pub enum PendingCmds {
    None,
    Some(Vec<PitchCmd>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.to_str().unwrap().to_string()));
        }

        // Load the script into a string
        let script = match fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e))
        };

        let mut interpreter = Self::from_str(&script)?;
        interpreter._script_path = path;

        Ok(interpreter)
    }

    /// Create a new interpreter from the script's raw text.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {

        // Empty queue of commands
        let mut cmd_queue: VecDeque<Command> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .unwrap();

        let mut num_caps = 0;

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = match cap.get(1).unwrap().as_str().parse() {
                Ok(t) => t,
                Err(e) => return Err(
                    ScriptError::InvalidTimestamp(format!("{}", e)))
            };

            // Parse the command from the payload. The scripts contain JSON
            // only.
            let cmd = match PitchCmd::from_json(
                cap.get(3).unwrap().as_str())
            {
                Ok(c) => c,
                Err(e) => return Err(ScriptError::InvalidCmd(
                    exec_time_s, e
                ))
            };

            // Build command from the match
            cmd_queue.push_back(Command {
                exec_time_s,
                cmd
            });

            num_caps += 1;
        }

        if num_caps == 0 {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            cmds: cmd_queue
        })
    }

    /// Return a vector of pending commands, or `None` if no commands need
    /// executing at the given sim time.
    ///
    /// Sim time is passed in rather than read from the wall clock so that
    /// command timing is deterministic under the executive's fixed tick.
    pub fn get_pending_cmds(&mut self, current_time_s: f64) -> PendingCmds {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.len() == 0 {
            return PendingCmds::EndOfScript
        }

        let mut cmd_vec: Vec<PitchCmd> = vec![];

        // Peek items from the queue, if the head's exec time is lower than
        // the current time add it to the vector, and keep adding commands
        // until the exec times are larger than the current time.
        while
            self.cmds.len() > 0
            &&
            self.cmds.front().unwrap().exec_time_s < current_time_s
        {
            cmd_vec.push(self.cmds.pop_front().unwrap().cmd);
        }

        // If the vector is longer than 0 return Some, otherwise None
        if cmd_vec.len() > 0 {
            PendingCmds::Some(cmd_vec)
        }
        else {
            PendingCmds::None
        }
    }

    /// Get the number of commands in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = r#"
        0.5: {"type": "POLL", "payload": {"grip": true, "trigger": false}};
        1.0: {"type": "HAND", "payload": "LEFT"};
        2.0: {"type": "LAUNCH"};
        10.0: {"type": "RESET"};
    "#;

    #[test]
    fn test_script_parse() {
        let si = ScriptInterpreter::from_str(SCRIPT).unwrap();
        assert_eq!(si.get_num_cmds(), 4);
        assert_eq!(si.get_duration(), 10.0);
    }

    #[test]
    fn test_pending_cmds() {
        let mut si = ScriptInterpreter::from_str(SCRIPT).unwrap();

        // Nothing is pending before the first timestamp
        assert!(matches!(si.get_pending_cmds(0.25), PendingCmds::None));

        // Both the poll and the hand selection are due by 1.5 s
        match si.get_pending_cmds(1.5) {
            PendingCmds::Some(cmds) => assert_eq!(cmds.len(), 2),
            _ => panic!("expected pending commands")
        }

        // Drain the rest, after which the script reports its end
        match si.get_pending_cmds(20.0) {
            PendingCmds::Some(cmds) => assert_eq!(cmds.len(), 2),
            _ => panic!("expected pending commands")
        }
        assert!(matches!(
            si.get_pending_cmds(20.0),
            PendingCmds::EndOfScript
        ));
    }

    #[test]
    fn test_empty_script() {
        assert!(matches!(
            ScriptInterpreter::from_str("not a script"),
            Err(ScriptError::ScriptEmpty)
        ));
    }
}
