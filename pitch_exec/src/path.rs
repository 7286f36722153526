//! # Path
//!
//! This module defines the waypoint path followed by a pitched ball, and the
//! catalog of per-pitch path shapes.
//!
//! A path is an ordered sequence of points in the world frame. The first
//! point is always exactly the origin captured when the controller was
//! initialised; the remaining points are type-specific offsets from that
//! origin, chosen so that consecutive segments impose smooth direction
//! changes and the downstream orientation filter stays stable.
//!
//! Paths are value-semantic: each regeneration produces a new sequence which
//! is swapped wholesale into the follower, never mutated in place.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// Internal
use cmd_if::pitch::{PitchType, ThrowHand};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Straight: dead ahead with a late drop. Laterally symmetric.
const STRAIGHT_OFFSETS_M: [[f64; 3]; 11] = [
    [0.0, 0.0, 5.0],
    [0.0, 0.0, 15.0],
    [0.0, 0.0, 25.0],
    [0.0, 0.0, 35.0],
    [0.0, 0.0, 45.0],
    [0.0, 0.0, 55.0],
    [0.0, 0.0, 65.0],
    [0.0, 0.0, 75.0],
    [0.0, 0.0, 85.0],
    [0.0, -1.0, 95.0],
    [0.0, -2.0, 105.0],
];

/// Fork: straight out then a hard late drop. Laterally symmetric.
const FORK_OFFSETS_M: [[f64; 3]; 3] = [
    [0.0, 0.0, 10.0],
    [0.0, 0.0, 50.0],
    [0.0, -30.0, 200.0],
];

/// Slider: straight start breaking progressively sideways. Offsets are for a
/// right-handed throw; a left-handed throw mirrors them in X.
const SLIDER_OFFSETS_M: [[f64; 3]; 11] = [
    [0.0, 0.0, 5.0],
    [0.0, 0.0, 15.0],
    [-1.0, 0.0, 25.0],
    [-3.0, 0.0, 35.0],
    [-6.0, 0.0, 45.0],
    [-10.0, 0.0, 55.0],
    [-15.0, 0.0, 65.0],
    [-20.0, 0.0, 75.0],
    [-25.0, 0.0, 85.0],
    [-30.0, 0.0, 95.0],
    [-35.0, 0.0, 105.0],
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the ball.
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct Path {
    pub points_m: Vec<Vector3<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new empty path
    pub fn new_empty() -> Self {
        Path {
            points_m: Vec::new(),
        }
    }

    /// Generate the path for the given pitch type and throw hand, starting
    /// at the given origin.
    ///
    /// Pure and deterministic. The returned path always begins with exactly
    /// `origin` and always has at least two points: should a shape table
    /// ever yield no offsets a synthetic near point is appended so the
    /// follower has a heading.
    pub fn for_pitch(
        pitch_type: PitchType,
        hand: ThrowHand,
        origin_m: &Vector3<f64>,
    ) -> Self {
        let offsets: &[[f64; 3]] = match pitch_type {
            PitchType::Straight => &STRAIGHT_OFFSETS_M,
            PitchType::Fork => &FORK_OFFSETS_M,
            PitchType::Slider => &SLIDER_OFFSETS_M,
        };

        // A left handed throw mirrors the lateral offsets. Symmetric shapes
        // have zero lateral offset so the mirror has no effect on them.
        let mirror_x = match hand {
            ThrowHand::Right => 1.0,
            ThrowHand::Left => -1.0,
        };

        let mut path = Path {
            points_m: Vec::with_capacity(offsets.len() + 1),
        };

        path.points_m.push(*origin_m);

        for offset in offsets {
            path.points_m.push(
                origin_m + Vector3::new(mirror_x * offset[0], offset[1], offset[2]),
            );
        }

        // The shape tables make this unreachable, but a path with fewer than
        // two points would leave the follower with no heading
        if path.points_m.len() < 2 {
            warn!(
                "Path for {:?}/{:?} has too few points, appending a synthetic near point",
                pitch_type, hand
            );
            path.points_m.push(origin_m + Vector3::new(0.0, 0.0, 0.1));
        }

        path
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.len() == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ALL_TYPES: [PitchType; 3] =
        [PitchType::Straight, PitchType::Fork, PitchType::Slider];
    const ALL_HANDS: [ThrowHand; 2] = [ThrowHand::Right, ThrowHand::Left];

    #[test]
    fn test_starts_at_origin() {
        let origin = Vector3::new(1.0, 2.0, 3.0);

        for &pitch_type in &ALL_TYPES {
            for &hand in &ALL_HANDS {
                let path = Path::for_pitch(pitch_type, hand, &origin);

                assert_eq!(path.points_m[0], origin);
                assert!(path.get_num_points() >= 2);
            }
        }
    }

    #[test]
    fn test_straight_catalog() {
        let path = Path::for_pitch(
            PitchType::Straight,
            ThrowHand::Right,
            &Vector3::zeros(),
        );

        assert_eq!(path.points_m[1], Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(path.points_m[10], Vector3::new(0.0, -1.0, 95.0));
        assert_eq!(path.get_num_points(), 12);
    }

    #[test]
    fn test_slider_hand_mirroring() {
        let origin = Vector3::zeros();
        let right = Path::for_pitch(PitchType::Slider, ThrowHand::Right, &origin);
        let left = Path::for_pitch(PitchType::Slider, ThrowHand::Left, &origin);

        assert_eq!(right.get_num_points(), left.get_num_points());

        for (r, l) in right.points_m.iter().zip(left.points_m.iter()) {
            assert_eq!(r[0], -l[0]);
            assert_eq!(r[1], l[1]);
            assert_eq!(r[2], l[2]);
        }

        // The break is to the left for a right handed throw
        assert!(right.points_m.last().unwrap()[0] < 0.0);
        assert!(left.points_m.last().unwrap()[0] > 0.0);
    }

    #[test]
    fn test_hand_has_no_effect_on_symmetric_shapes() {
        let origin = Vector3::new(-4.0, 0.5, 12.0);

        for &pitch_type in &[PitchType::Straight, PitchType::Fork] {
            let right = Path::for_pitch(pitch_type, ThrowHand::Right, &origin);
            let left = Path::for_pitch(pitch_type, ThrowHand::Left, &origin);

            assert_eq!(right.points_m, left.points_m);
        }
    }
}
