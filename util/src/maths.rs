//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{UnitQuaternion, Vector3};
use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::AddAssign
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Get the attitude quaternion which points the body's Z+ axis along
/// `forward`, keeping the body's Y+ axis as close to `up` as possible.
///
/// If `forward` is degenerate (zero length) or parallel to `up` no single
/// attitude satisfies the request and `None` is returned.
pub fn look_rotation(
    forward: &Vector3<f64>,
    up: &Vector3<f64>
) -> Option<UnitQuaternion<f64>> {
    if forward.norm() <= std::f64::EPSILON {
        return None;
    }

    // A forward parallel to up leaves the roll axis unconstrained
    if forward.cross(up).norm() <= std::f64::EPSILON {
        return None;
    }

    Some(UnitQuaternion::face_towards(forward, up))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&0.5f64, &0f64, &1f64), 0.5f64);
        assert_eq!(clamp(&-1f64, &0f64, &1f64), 0f64);
        assert_eq!(clamp(&2f64, &0f64, &1f64), 1f64);
    }

    #[test]
    fn test_look_rotation() {
        let up = Vector3::y();

        // Looking along Z+ is the identity attitude
        let q = look_rotation(&Vector3::z(), &up).unwrap();
        assert!((q.transform_vector(&Vector3::z()) - Vector3::z()).norm() < 1e-9);

        // Looking along X+ takes the body Z+ axis onto X+
        let q = look_rotation(&Vector3::x(), &up).unwrap();
        assert!((q.transform_vector(&Vector3::z()) - Vector3::x()).norm() < 1e-9);

        // Degenerate requests give no attitude
        assert!(look_rotation(&Vector3::zeros(), &up).is_none());
        assert!(look_rotation(&Vector3::y(), &up).is_none());
    }
}
