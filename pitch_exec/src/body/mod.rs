//! # Rigid body module
//!
//! This module provides the simulated rigid body the trajectory controller
//! steers. The body integrates applied forces and gravity with a
//! semi-implicit Euler step at the executive's fixed physics rate.
//!
//! While the body is kinematic it is pinned: forces and gravity are ignored
//! and the pose only changes through explicit sets. This is how the ball is
//! held at the origin while a pitch is being selected.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{UnitQuaternion, Vector3};

// Internal
pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A rigid body with a pose, velocities, and a force accumulator.
#[derive(Clone)]
pub struct RigidBody {
    params: Params,

    /// Position in the world frame
    position_m: Vector3<f64>,

    /// Attitude quaternion rotating the body frame into the world frame
    attitude_q: UnitQuaternion<f64>,

    /// Linear velocity in the world frame
    lin_vel_ms: Vector3<f64>,

    /// Angular velocity in the world frame
    ang_vel_rads: Vector3<f64>,

    /// While true the body ignores forces and gravity
    kinematic: bool,

    /// Forces accumulated since the last integration step
    force_accum_n: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RigidBody {
    /// Create a new dynamic body at the world origin.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            position_m: Vector3::zeros(),
            attitude_q: UnitQuaternion::identity(),
            lin_vel_ms: Vector3::zeros(),
            ang_vel_rads: Vector3::zeros(),
            kinematic: false,
            force_accum_n: Vector3::zeros(),
        }
    }

    /// Accumulate a force to be applied over the next integration step.
    ///
    /// Forces applied to a kinematic body are dropped.
    pub fn apply_force(&mut self, force_n: Vector3<f64>) {
        if !self.kinematic {
            self.force_accum_n += force_n;
        }
    }

    /// Integrate the body forward by one fixed step.
    ///
    /// Semi-implicit Euler: the velocity is updated from the accumulated
    /// forces first, then the position from the new velocity. The force
    /// accumulator is cleared whether or not the body is kinematic.
    pub fn step(&mut self, dt_s: f64) {
        if self.kinematic {
            self.force_accum_n = Vector3::zeros();
            return;
        }

        let mut accel_mss = self.force_accum_n / self.params.mass_kg;

        if self.params.use_gravity {
            accel_mss += Vector3::new(0.0, -self.params.gravity_mss, 0.0);
        }

        self.lin_vel_ms += accel_mss * dt_s;
        self.position_m += self.lin_vel_ms * dt_s;

        // Integrate the attitude from the angular velocity
        let ang_speed_rads = self.ang_vel_rads.norm();
        if ang_speed_rads > std::f64::EPSILON {
            let rotation = UnitQuaternion::from_scaled_axis(self.ang_vel_rads * dt_s);
            self.attitude_q = rotation * self.attitude_q;
        }

        self.force_accum_n = Vector3::zeros();
    }

    /// Pin or release the body.
    pub fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;

        if kinematic {
            self.force_accum_n = Vector3::zeros();
        }
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    /// Zero the linear and angular velocities.
    pub fn zero_motion(&mut self) {
        self.lin_vel_ms = Vector3::zeros();
        self.ang_vel_rads = Vector3::zeros();
        self.force_accum_n = Vector3::zeros();
    }

    pub fn set_position(&mut self, position_m: Vector3<f64>) {
        self.position_m = position_m;
    }

    pub fn set_attitude(&mut self, attitude_q: UnitQuaternion<f64>) {
        self.attitude_q = attitude_q;
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position_m
    }

    pub fn attitude(&self) -> UnitQuaternion<f64> {
        self.attitude_q
    }

    pub fn lin_vel(&self) -> Vector3<f64> {
        self.lin_vel_ms
    }

    pub fn ang_vel(&self) -> Vector3<f64> {
        self.ang_vel_rads
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kinematic_pinning() {
        let mut body = RigidBody::new(Params::default());
        body.set_kinematic(true);

        body.apply_force(Vector3::new(100.0, 0.0, 0.0));
        body.step(0.02);

        // A pinned body does not move, even under gravity
        assert_eq!(body.position(), Vector3::zeros());
        assert_eq!(body.lin_vel(), Vector3::zeros());
    }

    #[test]
    fn test_force_integration() {
        let mut body = RigidBody::new(Params {
            mass_kg: 2.0,
            gravity_mss: 9.81,
            use_gravity: false,
        });

        body.apply_force(Vector3::new(0.0, 0.0, 10.0));
        body.step(0.1);

        // a = F/m = 5, v = a*dt = 0.5, x = v*dt = 0.05
        assert_relative_eq!(body.lin_vel()[2], 0.5);
        assert_relative_eq!(body.position()[2], 0.05);

        // The accumulator is cleared between steps
        body.step(0.1);
        assert_relative_eq!(body.lin_vel()[2], 0.5);
        assert_relative_eq!(body.position()[2], 0.1);
    }

    #[test]
    fn test_gravity() {
        let mut body = RigidBody::new(Params::default());

        body.step(1.0);

        assert_relative_eq!(body.lin_vel()[1], -9.81);
    }
}
