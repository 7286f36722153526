//! # PitchMgr module
//!
//! This module implements the [`PitchMgr`] state machine, which owns the
//! ball and governs the full life of a pitch:
//!
//! - `Armed` - the ball is pinned at the origin and the operator may change
//!   the pitch type (via the two selection buttons) and the throwing hand.
//!   Every selection change regenerates the path.
//! - `Launched` - the selection is frozen, the ball is dynamic and
//!   trajectory control steers it along the path.
//! - `Completed` - the ball has reached the final waypoint. Behaves like
//!   `Launched` until the reset timer fires and returns the system to
//!   `Armed`.
//!
//! The manager is driven by two periodic callbacks: `tick` at the fixed
//! physics rate and `poll_input` at the input rate. Commands (`launch`,
//! `reset_now`, `select_hand`) may arrive at any point between them. All
//! transitions happen synchronously inside those calls; there is no
//! parallelism in the core.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod scheduler;
mod selection;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, info};
use nalgebra::{UnitQuaternion, Vector3};

// Internal
pub use params::Params;
pub use scheduler::ResetTimer;
pub use selection::SelectionState;

use crate::body::RigidBody;
use crate::path::Path;
use crate::traj_ctrl::{self, TrajCtrl, TrajCtrlError};
use cmd_if::event::PitchEvent;
use cmd_if::pitch::{PitchType, ThrowHand};
use util::{module::State, session::Session};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The launch gate of the pitch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GateState {
    /// Selection mutable, ball pinned at the origin.
    Armed,

    /// Selection frozen, ball in flight.
    Launched,

    /// The ball reached its final waypoint; the reset timer is running.
    Completed,
}

/// Errors that can occur in the pitch manager.
#[derive(Debug, thiserror::Error)]
pub enum PitchMgrError {
    #[error("Failed to load PitchMgr params: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Failed to initialise TrajCtrl: {0}")]
    TrajCtrlInitError(util::params::LoadError),

    #[error("No rigid body is bound to the controller, refusing to activate")]
    NoBodyBound,

    #[error("Error in TrajCtrl: {0}")]
    TrajCtrlError(TrajCtrlError),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Pitch Manager
///
/// Owns the rigid body, the trajectory controller and the selection state,
/// and exposes the command surface the executive drives.
pub struct PitchMgr {
    params: Params,

    /// The ball. Bound at initialisation; a manager without a body refuses
    /// to initialise.
    body: RigidBody,

    /// Trajectory controller following the selected path.
    traj_ctrl: TrajCtrl,

    /// Current pitch type and throwing hand.
    selection: SelectionState,

    /// The launch gate.
    gate: GateState,

    /// One-shot timer driving the automatic post-flight reset.
    reset_timer: ResetTimer,

    /// Position of the ball at initialisation. All paths start here and
    /// every reset returns the ball here.
    origin_m: Vector3<f64>,

    /// Attitude of the ball at initialisation.
    origin_q: UnitQuaternion<f64>,

    /// Notifications accumulated since the last `take_events`.
    events: Vec<PitchEvent>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PitchMgr {
    /// Initialise the manager from parameter files.
    ///
    /// Expected init data is the path to the manager's parameter file. The
    /// trajectory controller is initialised from its own file. The origin
    /// is captured from the body's pose at this point.
    pub fn init(
        params_path: &str,
        body: Option<RigidBody>,
        session: &Session,
    ) -> Result<Self, PitchMgrError> {
        let params: Params =
            util::params::load(params_path).map_err(PitchMgrError::ParamLoadError)?;

        let mut traj_ctrl = TrajCtrl::default();
        traj_ctrl
            .init("traj_ctrl.toml", session)
            .map_err(PitchMgrError::TrajCtrlInitError)?;

        Self::build(params, traj_ctrl, body)
    }

    /// Initialise the manager from in-memory parameters, with no archiving.
    ///
    /// Used where no parameter files or session are available, for example
    /// in tests.
    pub fn with_params(
        params: Params,
        traj_ctrl_params: traj_ctrl::Params,
        body: Option<RigidBody>,
    ) -> Result<Self, PitchMgrError> {
        Self::build(params, TrajCtrl::with_params(traj_ctrl_params), body)
    }

    fn build(
        params: Params,
        mut traj_ctrl: TrajCtrl,
        body: Option<RigidBody>,
    ) -> Result<Self, PitchMgrError> {
        let mut body = match body {
            Some(b) => b,
            None => return Err(PitchMgrError::NoBodyBound),
        };

        // The body's pose at initialisation is the origin of every path
        let origin_m = body.position();
        let origin_q = body.attitude();

        let selection = SelectionState::default();

        traj_ctrl.set_path(Path::for_pitch(
            selection.pitch_type(),
            selection.hand(),
            &origin_m,
        ));

        // Pin the ball until launch
        body.zero_motion();
        body.set_kinematic(true);

        Ok(Self {
            params,
            body,
            traj_ctrl,
            selection,
            gate: GateState::Armed,
            reset_timer: ResetTimer::new(),
            origin_m,
            origin_q,
            events: Vec::new(),
        })
    }

    /// Sample the two selection buttons. Called once per input tick.
    ///
    /// Selection is frozen once the ball has been launched, so samples are
    /// ignored unless the gate is armed. Holding a combination across many
    /// samples changes the selection (and regenerates the path) exactly
    /// once.
    pub fn poll_input(&mut self, grip_held: bool, trigger_held: bool) {
        if self.gate != GateState::Armed {
            return;
        }

        if let Some(new_type) = self.selection.apply_levels(grip_held, trigger_held) {
            info!("Pitch type changed to {:?}", new_type);
            self.on_selection_changed();
        }
    }

    /// Select a pitch type directly.
    ///
    /// Ignored unless the gate is armed.
    pub fn select(&mut self, pitch_type: PitchType) {
        if self.gate != GateState::Armed {
            debug!("Selection of {:?} ignored, ball is in flight", pitch_type);
            return;
        }

        if self.selection.set_pitch_type(pitch_type) {
            info!("Pitch type changed to {:?}", pitch_type);
            self.on_selection_changed();
        }
    }

    /// Select the throwing hand.
    ///
    /// Ignored unless the gate is armed. A hand change regenerates the
    /// path, since it mirrors curve-breaking shapes.
    pub fn select_hand(&mut self, hand: ThrowHand) {
        if self.gate != GateState::Armed {
            debug!("Hand selection of {:?} ignored, ball is in flight", hand);
            return;
        }

        if self.selection.set_hand(hand) {
            info!("Throw hand changed to {:?}", hand);
            self.on_selection_changed();
        }
    }

    /// Launch the ball along the currently selected path.
    ///
    /// Transitions `Armed` to `Launched` and releases the kinematic
    /// pinning. Idempotent: launching while already in flight is a no-op,
    /// so a mid-flight re-launch is impossible.
    pub fn launch(&mut self) {
        match self.gate {
            GateState::Armed => {
                info!("Ball launched: {:?}/{:?}",
                    self.selection.pitch_type(), self.selection.hand());

                self.gate = GateState::Launched;
                self.body.set_kinematic(false);
                self.events.push(PitchEvent::Launched);
            }
            _ => {
                debug!("Launch ignored, ball is already in flight");
            }
        }
    }

    /// Immediately return the system to the launch-ready state, from any
    /// gate state.
    ///
    /// The ball is re-pinned at the origin with zero velocity, the path is
    /// regenerated for the current selection, and any pending reset timer
    /// is cancelled so a stale timer can never reset a relaunched ball.
    pub fn reset_now(&mut self) {
        self.reset_timer.cancel();

        self.body.set_position(self.origin_m);
        self.body.set_attitude(self.origin_q);
        self.body.zero_motion();
        self.body.set_kinematic(true);

        self.traj_ctrl.set_path(Path::for_pitch(
            self.selection.pitch_type(),
            self.selection.hand(),
            &self.origin_m,
        ));

        self.gate = GateState::Armed;
        self.events.push(PitchEvent::Reset);

        info!("Ball reset, awaiting launch");
    }

    /// Advance the simulation by one fixed physics step.
    ///
    /// While armed this is a no-op (the ball is pinned). Once launched the
    /// trajectory controller is processed, its demands are applied to the
    /// body, and the body is integrated, in that fixed order. Reaching the
    /// final waypoint arms the reset timer; the timer is polled at the
    /// start of every tick.
    pub fn tick(&mut self, now_s: f64, dt_s: f64) -> Result<(), PitchMgrError> {
        // The pending reset deadline is checked at fire time, so a
        // cancellation between ticks always wins
        if self.reset_timer.poll(now_s) {
            self.reset_now();
            return Ok(());
        }

        if self.gate == GateState::Armed {
            return Ok(());
        }

        let input = traj_ctrl::InputData {
            position_m: self.body.position(),
            lin_vel_ms: self.body.lin_vel(),
            attitude_q: self.body.attitude(),
            dt_s,
        };

        let (output, _report) = self
            .traj_ctrl
            .proc(&input)
            .map_err(PitchMgrError::TrajCtrlError)?;

        if let Some(force_n) = output.force_n {
            self.body.apply_force(force_n);
        }

        if let Some(attitude_q) = output.attitude_q {
            self.body.set_attitude(attitude_q);
        }

        if output.arrived {
            info!("Ball reached the final waypoint");

            self.gate = GateState::Completed;
            self.reset_timer.arm(now_s, self.params.reset_delay_s);
            self.events.push(PitchEvent::Arrived);
        }

        self.body.step(dt_s);

        Ok(())
    }

    /// Drain the notifications accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<PitchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn gate(&self) -> GateState {
        self.gate
    }

    pub fn pitch_type(&self) -> PitchType {
        self.selection.pitch_type()
    }

    pub fn hand(&self) -> ThrowHand {
        self.selection.hand()
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn traj_ctrl(&self) -> &TrajCtrl {
        &self.traj_ctrl
    }

    /// Regenerate the path after a selection change and notify.
    fn on_selection_changed(&mut self) {
        self.traj_ctrl.set_path(Path::for_pitch(
            self.selection.pitch_type(),
            self.selection.hand(),
            &self.origin_m,
        ));

        self.events.push(PitchEvent::Selected {
            pitch_type: self.selection.pitch_type(),
            hand: self.selection.hand(),
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::body;

    const DT_S: f64 = 0.02;

    fn make_mgr() -> PitchMgr {
        PitchMgr::with_params(
            Params::default(),
            traj_ctrl::Params::default(),
            Some(RigidBody::new(body::Params::default())),
        )
        .unwrap()
    }

    /// Tick the manager until the given gate state is reached, returning
    /// the sim time at which it was. Panics if it never is.
    fn tick_until(mgr: &mut PitchMgr, gate: GateState, from_cycle: &mut u64) -> f64 {
        loop {
            let now_s = *from_cycle as f64 * DT_S;
            mgr.tick(now_s, DT_S).unwrap();
            *from_cycle += 1;

            if mgr.gate() == gate {
                return now_s;
            }

            assert!(
                now_s < 60.0,
                "gate never reached {:?} within 60 s of sim time",
                gate
            );
        }
    }

    #[test]
    fn test_no_body_is_fatal() {
        let result = PitchMgr::with_params(
            Params::default(),
            traj_ctrl::Params::default(),
            None,
        );

        assert!(matches!(result, Err(PitchMgrError::NoBodyBound)));
    }

    #[test]
    fn test_selection_debounce() {
        let mut mgr = make_mgr();

        // Hold both buttons across many input ticks: one transition to
        // Fork, one path regeneration
        for _ in 0..20 {
            mgr.poll_input(true, true);
        }

        assert_eq!(mgr.pitch_type(), PitchType::Fork);

        let events = mgr.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], PitchEvent::Selected { .. }));
    }

    #[test]
    fn test_selection_sequence() {
        let mut mgr = make_mgr();

        // Move off the default selection first
        mgr.poll_input(false, true);
        assert_eq!(mgr.pitch_type(), PitchType::Slider);
        mgr.take_events();

        // Grip only, then both: exactly two regenerations, Straight then
        // Fork
        mgr.poll_input(true, false);
        mgr.poll_input(true, true);

        let events = mgr.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            PitchEvent::Selected {
                pitch_type: PitchType::Straight,
                hand: ThrowHand::Right
            }
        );
        assert_eq!(
            events[1],
            PitchEvent::Selected {
                pitch_type: PitchType::Fork,
                hand: ThrowHand::Right
            }
        );
    }

    #[test]
    fn test_hand_change_regenerates_path() {
        let mut mgr = make_mgr();

        mgr.poll_input(false, true);
        let right_path = mgr.traj_ctrl().path().clone();

        mgr.select_hand(ThrowHand::Left);
        let left_path = mgr.traj_ctrl().path().clone();

        // Slider breaks left for a right handed throw, right for a left
        // handed one
        assert!(right_path.points_m.last().unwrap()[0] < 0.0);
        assert!(left_path.points_m.last().unwrap()[0] > 0.0);
    }

    #[test]
    fn test_launch_is_idempotent() {
        let mut mgr = make_mgr();

        mgr.launch();
        assert_eq!(mgr.gate(), GateState::Launched);

        // The second launch is a no-op
        mgr.launch();
        assert_eq!(mgr.gate(), GateState::Launched);

        let launches = mgr
            .take_events()
            .iter()
            .filter(|e| matches!(e, PitchEvent::Launched))
            .count();
        assert_eq!(launches, 1);
    }

    #[test]
    fn test_selection_frozen_after_launch() {
        let mut mgr = make_mgr();
        mgr.launch();
        mgr.take_events();

        let path_before = mgr.traj_ctrl().path().clone();

        mgr.poll_input(true, true);
        mgr.select(PitchType::Slider);
        mgr.select_hand(ThrowHand::Left);

        assert_eq!(mgr.pitch_type(), PitchType::Straight);
        assert_eq!(mgr.hand(), ThrowHand::Right);
        assert_eq!(mgr.traj_ctrl().path().points_m, path_before.points_m);
        assert!(mgr.take_events().is_empty());
    }

    #[test]
    fn test_armed_tick_is_a_no_op() {
        let mut mgr = make_mgr();

        for i in 0..100 {
            mgr.tick(i as f64 * DT_S, DT_S).unwrap();
        }

        // Pinned: gravity has not moved the ball, nothing has advanced
        assert_eq!(mgr.body().position(), Vector3::zeros());
        assert_eq!(mgr.body().lin_vel(), Vector3::zeros());
        assert_eq!(mgr.traj_ctrl().target_index(), 0);
        assert_eq!(mgr.gate(), GateState::Armed);
    }

    #[test]
    fn test_full_flight_and_auto_reset() {
        let mut mgr = make_mgr();
        let mut cycle = 0u64;

        mgr.launch();

        let arrived_s = tick_until(&mut mgr, GateState::Completed, &mut cycle);
        let reset_s = tick_until(&mut mgr, GateState::Armed, &mut cycle);

        // The automatic reset happens one reset delay after arrival, to
        // within a tick
        let delay_s = reset_s - arrived_s;
        assert!(delay_s >= 5.0 && delay_s < 5.0 + 2.0 * DT_S,
            "reset fired {} s after arrival", delay_s);

        // The ball is back at the origin, pinned and ready to go again
        assert_eq!(mgr.body().position(), Vector3::zeros());
        assert_eq!(mgr.body().lin_vel(), Vector3::zeros());
        assert!(mgr.body().is_kinematic());
        assert_eq!(mgr.traj_ctrl().target_index(), 0);

        let events = mgr.take_events();
        assert!(events.contains(&PitchEvent::Arrived));
        assert!(events.contains(&PitchEvent::Reset));
    }

    #[test]
    fn test_manual_reset_cancels_timer() {
        let mut mgr = make_mgr();
        let mut cycle = 0u64;

        mgr.launch();
        let arrived_s = tick_until(&mut mgr, GateState::Completed, &mut cycle);

        // Manually reset half way through the delay
        while (cycle as f64 * DT_S) < arrived_s + 2.5 {
            mgr.tick(cycle as f64 * DT_S, DT_S).unwrap();
            cycle += 1;
        }
        mgr.reset_now();

        // Keep ticking well past where the timer would have fired; no
        // second reset may happen
        while (cycle as f64 * DT_S) < arrived_s + 10.0 {
            mgr.tick(cycle as f64 * DT_S, DT_S).unwrap();
            cycle += 1;
        }

        let resets = mgr
            .take_events()
            .iter()
            .filter(|e| matches!(e, PitchEvent::Reset))
            .count();
        assert_eq!(resets, 1);
        assert_eq!(mgr.gate(), GateState::Armed);
    }

    #[test]
    fn test_relaunch_after_reset() {
        let mut mgr = make_mgr();
        let mut cycle = 0u64;

        mgr.launch();
        tick_until(&mut mgr, GateState::Completed, &mut cycle);
        tick_until(&mut mgr, GateState::Armed, &mut cycle);

        // A second full cycle works from the same origin
        mgr.launch();
        assert_eq!(mgr.gate(), GateState::Launched);
        tick_until(&mut mgr, GateState::Completed, &mut cycle);
    }
}
