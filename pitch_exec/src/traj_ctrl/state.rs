//! Implementations for the TrajCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::{UnitQuaternion, Vector3};
use serde::Serialize;

// Internal
use super::{Params, TrajCtrlError};
use crate::path::Path;
use util::{
    archive::Archiver,
    maths,
    module::State,
    params,
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory control module state
#[derive(Default)]
pub struct TrajCtrl {

    params: Params,

    /// The path currently being followed. Replaced wholesale on
    /// reselection, never mutated in place.
    path: Path,

    /// Index of the current target point within the path.
    ///
    /// Starts at 0 and is monotonically non-decreasing until `reset`. The
    /// path is complete when this reaches the number of points in the path.
    target_index: usize,

    report: StatusReport,
    arch_report: Archiver,
}

/// Input data to the module.
#[derive(Copy, Clone)]
pub struct InputData {
    /// Position of the ball in the world frame
    pub position_m: Vector3<f64>,

    /// Linear velocity of the ball in the world frame
    pub lin_vel_ms: Vector3<f64>,

    /// Current attitude of the ball
    pub attitude_q: UnitQuaternion<f64>,

    /// Duration of this physics step
    pub dt_s: f64,
}

/// Output demands from the module, to be applied to the body this step.
#[derive(Default, Copy, Clone)]
pub struct OutputData {
    /// Steering force to apply, or `None` if no force is demanded this step
    pub force_n: Option<Vector3<f64>>,

    /// Filtered attitude demand, or `None` if the ball is stationary
    pub attitude_q: Option<UnitQuaternion<f64>>,

    /// True if the final waypoint was reached this step
    pub arrived: bool,
}

/// The status report containing monitoring quantities.
#[derive(Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Index of the current target point
    pub target_index: usize,

    /// Number of points in the current path
    pub num_points: usize,

    /// Distance from the ball to the current target
    pub dist_to_target_m: f64,

    /// Current speed of the ball
    pub speed_ms: f64,

    /// True if the ball has reached the final waypoint
    pub arrived: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TrajCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = TrajCtrlError;

    /// Initialise the TrajCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(e)
        };

        // Create the arch folder for traj_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("traj_ctrl");
        if let Err(e) = std::fs::create_dir_all(arch_path) {
            warn!("Could not create the traj_ctrl archive directory: {}", e);
        }

        // Initialise the archiver. Failure to archive is never fatal.
        match Archiver::from_path(session, "traj_ctrl/status_report.csv") {
            Ok(a) => self.arch_report = a,
            Err(e) => warn!("Could not initialise the traj_ctrl archiver: {}", e)
        }

        Ok(())
    }

    /// Perform cyclic processing of trajectory control.
    ///
    /// Processing involves:
    ///  1. Computing the steering force demand towards the current target.
    ///  2. Computing the filtered attitude demand from the velocity.
    ///  3. Advancing the target index if within the arrival threshold.
    ///
    /// Calling `proc` after the final waypoint has been reached is always
    /// safe and does nothing.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let mut output = OutputData::default();

        // A module which was never given a path has nothing to follow. Note
        // this is different from having finished a path, which is a no-op.
        if self.path.is_empty() {
            return Err(TrajCtrlError::NoPathLoaded);
        }

        let num_points = self.path.get_num_points();

        self.report = StatusReport {
            target_index: self.target_index,
            num_points,
            speed_ms: input_data.lin_vel_ms.norm(),
            ..StatusReport::default()
        };

        // ---- TARGET MANAGEMENT ----

        // Already arrived, nothing more to do
        if self.target_index >= num_points {
            self.report.arrived = true;
            self.archive();
            return Ok((output, self.report));
        }

        let target_m = self.path.points_m[self.target_index];
        let to_target_m = target_m - input_data.position_m;
        let dist_m = to_target_m.norm();

        self.report.dist_to_target_m = dist_m;

        // ---- FORCE DEMAND ----

        // If the ball sits exactly on the target the direction to it is
        // undefined and no force is demanded this step
        if dist_m > std::f64::EPSILON {
            let desired_vel_ms = (to_target_m / dist_m) * self.params.target_speed_ms;

            output.force_n = Some(
                (desired_vel_ms - input_data.lin_vel_ms) * self.params.steering_gain
            );
        }

        // ---- ATTITUDE DEMAND ----

        if self.report.speed_ms > self.params.stationary_threshold_ms {
            if let Some(look_q) =
                maths::look_rotation(&input_data.lin_vel_ms, &Vector3::y())
            {
                let frac = maths::clamp(
                    &(self.params.orient_gain * input_data.dt_s),
                    &0.0,
                    &1.0
                );

                // Antipodal attitudes have no unique interpolant, snap to
                // the demand in that case
                output.attitude_q = Some(
                    input_data.attitude_q
                        .try_slerp(&look_q, frac, 1.0e-9)
                        .unwrap_or(look_q)
                );
            }
        }

        // ---- ARRIVAL TEST ----

        if dist_m < self.params.arrival_threshold_m {
            self.target_index += 1;
            self.report.target_index = self.target_index;

            if self.target_index >= num_points {
                self.report.arrived = true;
                output.arrived = true;
            }
        }

        self.archive();

        Ok((output, self.report))
    }
}

impl TrajCtrl {
    /// Create a new module with the given parameters and no archiver.
    ///
    /// Used where no parameter file or session is available, for example in
    /// tests. The executive initialises the module with `init` instead.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Replace the path being followed.
    ///
    /// The new path is swapped in wholesale and following restarts from the
    /// first point.
    pub fn set_path(&mut self, path: Path) {
        self.path = path;
        self.target_index = 0;
    }

    /// Restart following from the first point of the current path.
    pub fn reset(&mut self) {
        self.target_index = 0;
    }

    /// Get the path currently being followed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the index of the current target point.
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// True if the final waypoint of the path has been reached.
    pub fn is_complete(&self) -> bool {
        !self.path.is_empty() && self.target_index >= self.path.get_num_points()
    }

    /// Write the status report into the archive.
    fn archive(&mut self) {
        if let Err(e) = self.arch_report.serialise(self.report) {
            warn!("Could not archive the traj_ctrl status report: {}", e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use cmd_if::pitch::{PitchType, ThrowHand};

    fn make_input(
        position_m: Vector3<f64>,
        lin_vel_ms: Vector3<f64>
    ) -> InputData {
        InputData {
            position_m,
            lin_vel_ms,
            attitude_q: UnitQuaternion::identity(),
            dt_s: 0.02,
        }
    }

    fn make_traj_ctrl() -> TrajCtrl {
        let mut traj_ctrl = TrajCtrl::with_params(Params::default());
        traj_ctrl.set_path(Path::for_pitch(
            PitchType::Straight,
            ThrowHand::Right,
            &Vector3::zeros()
        ));
        traj_ctrl
    }

    #[test]
    fn test_no_path_is_an_error() {
        let mut traj_ctrl = TrajCtrl::with_params(Params::default());

        let result = traj_ctrl.proc(&make_input(Vector3::zeros(), Vector3::zeros()));
        assert!(matches!(result, Err(TrajCtrlError::NoPathLoaded)));
    }

    #[test]
    fn test_force_demand() {
        let mut traj_ctrl = make_traj_ctrl();

        // First step: the ball sits exactly on the path's first point, so
        // no force is demanded and the index advances past it
        let (output, report) = traj_ctrl
            .proc(&make_input(Vector3::zeros(), Vector3::zeros()))
            .unwrap();

        assert!(output.force_n.is_none());
        assert_eq!(report.target_index, 1);

        // Second step: stationary ball, target straight ahead at (0,0,5).
        // Demand is the full desired velocity times the gain
        let (output, _) = traj_ctrl
            .proc(&make_input(Vector3::zeros(), Vector3::zeros()))
            .unwrap();

        let force_n = output.force_n.unwrap();
        assert_relative_eq!(force_n[0], 0.0);
        assert_relative_eq!(force_n[1], 0.0);
        assert_relative_eq!(force_n[2], 120.0 * 25.0);
    }

    #[test]
    fn test_attitude_demand_only_when_moving() {
        let mut traj_ctrl = make_traj_ctrl();

        // Stationary: no attitude demand
        let (output, _) = traj_ctrl
            .proc(&make_input(Vector3::new(0.0, 0.0, 1.0), Vector3::zeros()))
            .unwrap();
        assert!(output.attitude_q.is_none());

        // Moving: the attitude demand turns towards the velocity
        let (output, _) = traj_ctrl
            .proc(&make_input(
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(0.0, 0.0, 10.0)
            ))
            .unwrap();
        assert!(output.attitude_q.is_some());
    }

    #[test]
    fn test_index_monotonic_and_idempotent_after_arrival() {
        let mut traj_ctrl = make_traj_ctrl();

        // Walk the ball through every waypoint by teleporting it onto each
        let points = traj_ctrl.path().points_m.clone();
        let mut last_index = 0;

        for point in &points {
            let (_, report) = traj_ctrl
                .proc(&make_input(*point, Vector3::zeros()))
                .unwrap();
            assert!(report.target_index >= last_index);
            last_index = report.target_index;
        }

        assert!(traj_ctrl.is_complete());

        // Further steps never mutate the state or demand a force
        for _ in 0..10 {
            let (output, report) = traj_ctrl
                .proc(&make_input(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0)))
                .unwrap();

            assert!(output.force_n.is_none());
            assert!(output.attitude_q.is_none());
            assert!(!output.arrived);
            assert!(report.arrived);
            assert_eq!(report.target_index, points.len());
        }
    }

    #[test]
    fn test_arrival_reported_once() {
        let mut traj_ctrl = make_traj_ctrl();
        let points = traj_ctrl.path().points_m.clone();

        let mut num_arrivals = 0;
        for point in &points {
            let (output, _) = traj_ctrl
                .proc(&make_input(*point, Vector3::zeros()))
                .unwrap();
            if output.arrived {
                num_arrivals += 1;
            }
        }

        assert_eq!(num_arrivals, 1);
    }

    #[test]
    fn test_reset_restarts_path() {
        let mut traj_ctrl = make_traj_ctrl();

        traj_ctrl
            .proc(&make_input(Vector3::zeros(), Vector3::zeros()))
            .unwrap();
        assert_eq!(traj_ctrl.target_index(), 1);

        traj_ctrl.reset();
        assert_eq!(traj_ctrl.target_index(), 0);
    }

    #[test]
    fn test_orbit_never_advances() {
        // A ball circling the target outside the arrival threshold must
        // never advance the index, there is no time-based fallback
        let mut traj_ctrl = make_traj_ctrl();

        // Move past the origin point first
        traj_ctrl
            .proc(&make_input(Vector3::zeros(), Vector3::zeros()))
            .unwrap();

        // Orbit the (0,0,5) target at radius 3, above the 2 m threshold
        for i in 0..200 {
            let angle = (i as f64) * 0.1;
            let position_m = Vector3::new(
                3.0 * angle.cos(),
                3.0 * angle.sin(),
                5.0
            );
            let (_, report) = traj_ctrl
                .proc(&make_input(position_m, Vector3::new(1.0, 0.0, 0.0)))
                .unwrap();
            assert_eq!(report.target_index, 1);
        }
    }
}
