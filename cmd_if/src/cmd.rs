//! # Command module
//!
//! This module provides the commands accepted by the pitch executive, i.e.
//! the instructions sent to the controller by whatever input source is
//! driving it (script, remote operator, demo loop).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use serde_json::{self, Value};
use thiserror::Error;

// Internal
use crate::pitch::ThrowHand;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static TYPE_HAS_NO_PAYLOAD: [&str; 2] = ["LAUNCH", "RESET"];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command, i.e. an instruction sent to the pitch controller by the
/// operator's input source.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PitchCmd {
    /// A level-state sample of the two selection buttons. The latest sample
    /// is held and re-applied every input tick until a new one arrives.
    PollInput {
        /// True while the grip button is held
        grip: bool,

        /// True while the trigger button is held
        trigger: bool
    },

    /// Select the throwing hand. Edge-triggered; ignored after launch.
    SelectHand(ThrowHand),

    /// Launch the ball along the currently selected path.
    Launch,

    /// Immediately return the ball to the launch-ready state.
    Reset
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum CmdParseError {
    #[error("Command contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Command has an invalid type ({0})")]
    InvalidType(String),

    #[error("Command of type {0} is expected to have a payload but it doesn't")]
    MissingPayload(String),

    #[error("Command of type {0} has an invalid payload: {1}")]
    InvalidPayload(String, serde_json::Error)
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Payload of the `POLL` command.
#[derive(Deserialize)]
struct PollPayload {
    grip: bool,
    trigger: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PitchCmd {

    /// Parse a new command from a JSON packet.
    ///
    /// The packet format is `{"type": <type string>, "payload": <payload>}`,
    /// where the payload may be omitted for types which do not carry one.
    pub fn from_json(json_str: &str) -> Result<Self, CmdParseError> {
        // Parse the JSON string into a value
        let val: Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => return Err(CmdParseError::InvalidJson(e))
        };

        // Get the type of the command
        let cmd_type = match val["type"].as_str() {
            Some(s) => s,
            None => return Err(CmdParseError::InvalidType(String::from(
                "Expected \"type\" to be a string"
            )))
        };

        // Get the payload. If it's null and the type does not have a payload
        // then an error is returned
        if val["payload"].is_null()
            &&
            !TYPE_HAS_NO_PAYLOAD.contains(&cmd_type)
        {
            return Err(CmdParseError::MissingPayload(cmd_type.to_string()))
        }

        // Branch on the type, deserialising the payload where one is needed
        match cmd_type {
            "POLL" => {
                let payload: PollPayload =
                    match serde_json::from_value(val["payload"].clone()) {
                        Ok(p) => p,
                        Err(e) => return Err(CmdParseError::InvalidPayload(
                            cmd_type.to_string(), e
                        ))
                    };

                Ok(PitchCmd::PollInput {
                    grip: payload.grip,
                    trigger: payload.trigger
                })
            },
            "HAND" => {
                let hand: ThrowHand =
                    match serde_json::from_value(val["payload"].clone()) {
                        Ok(h) => h,
                        Err(e) => return Err(CmdParseError::InvalidPayload(
                            cmd_type.to_string(), e
                        ))
                    };

                Ok(PitchCmd::SelectHand(hand))
            },
            "LAUNCH" => Ok(PitchCmd::Launch),
            "RESET" => Ok(PitchCmd::Reset),
            _ => Err(CmdParseError::InvalidType(format!(
                "{} is not a recognised command type", cmd_type
            )))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        let cmd = PitchCmd::from_json(
            r#"{"type": "POLL", "payload": {"grip": true, "trigger": true}}"#
        ).unwrap();
        assert_eq!(cmd, PitchCmd::PollInput { grip: true, trigger: true });

        let cmd = PitchCmd::from_json(
            r#"{"type": "HAND", "payload": "LEFT"}"#
        ).unwrap();
        assert_eq!(cmd, PitchCmd::SelectHand(ThrowHand::Left));

        assert_eq!(
            PitchCmd::from_json(r#"{"type": "LAUNCH"}"#).unwrap(),
            PitchCmd::Launch
        );
        assert_eq!(
            PitchCmd::from_json(r#"{"type": "RESET"}"#).unwrap(),
            PitchCmd::Reset
        );
    }

    #[test]
    fn test_from_json_errors() {
        // Poll without a payload is rejected
        assert!(matches!(
            PitchCmd::from_json(r#"{"type": "POLL"}"#),
            Err(CmdParseError::MissingPayload(_))
        ));

        // Unknown types are rejected
        assert!(matches!(
            PitchCmd::from_json(r#"{"type": "FROBNICATE"}"#),
            Err(CmdParseError::InvalidType(_))
        ));

        // Bad JSON is rejected
        assert!(matches!(
            PitchCmd::from_json("not json"),
            Err(CmdParseError::InvalidJson(_))
        ));
    }
}
