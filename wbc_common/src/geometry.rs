//! Orientation encoding for the flat state vector.
//!
//! Goal orientations arrive as quaternions and are stored as Euler-ZYX
//! angles: `R = Rz(z) · Ry(y) · Rx(x)`, read off the rotation matrix that
//! `nalgebra::UnitQuaternion` builds. Composition uses nalgebra's
//! `(roll, pitch, yaw)` constructor, which is the same rotation order.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Quaternion as NaQuaternion, UnitQuaternion};

use crate::consts::POSE_SLOTS;
use crate::messages::{Pose, Quaternion};

/// Squared-norm threshold below which a quaternion is treated as identity.
const QUATERNION_NORM_EPSILON: f64 = 1e-10;

/// Distance [rad] from ±90° pitch treated as gimbal lock.
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-12;

/// Euler-ZYX decomposition [rad].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerZyx {
    /// Rotation about Z (applied last in the body-fixed sense).
    pub z: f64,
    /// Rotation about Y.
    pub y: f64,
    /// Rotation about X.
    pub x: f64,
}

impl EulerZyx {
    pub const fn new(z: f64, y: f64, x: f64) -> Self {
        Self { z, y, x }
    }

    /// Angles in state-vector order: `[z, y, x]`.
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.z, self.y, self.x]
    }
}

/// Normalize a wire quaternion.
///
/// Near-zero or non-finite quaternions have no defined rotation; they map to
/// identity so a malformed orientation encodes as `(0, 0, 0)`.
pub fn to_unit_quaternion(q: &Quaternion) -> UnitQuaternion<f64> {
    let finite = [q.x, q.y, q.z, q.w].iter().all(|c| c.is_finite());
    if !finite {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::try_new(
        NaQuaternion::new(q.w, q.x, q.y, q.z),
        QUATERNION_NORM_EPSILON.sqrt(),
    )
    .unwrap_or_else(UnitQuaternion::identity)
}

/// Decompose an orientation into Euler-ZYX angles.
///
/// Pitch comes from `atan2` rather than `asin`, so it stays accurate near
/// ±90°. Within [`GIMBAL_LOCK_EPSILON`] of the lock, yaw is fixed at zero and
/// the whole rotation about the shared axis goes into roll.
pub fn quaternion_to_euler_zyx(q: &Quaternion) -> EulerZyx {
    let rot = to_unit_quaternion(q).to_rotation_matrix();
    let m = rot.matrix();

    let y = (-m[(2, 0)]).atan2(m[(0, 0)].hypot(m[(1, 0)]));
    if (y - FRAC_PI_2).abs() < GIMBAL_LOCK_EPSILON {
        EulerZyx::new(0.0, y, m[(0, 1)].atan2(m[(1, 1)]))
    } else if (y + FRAC_PI_2).abs() < GIMBAL_LOCK_EPSILON {
        EulerZyx::new(0.0, y, -m[(0, 1)].atan2(m[(1, 1)]))
    } else {
        EulerZyx::new(
            m[(1, 0)].atan2(m[(0, 0)]),
            y,
            m[(2, 1)].atan2(m[(2, 2)]),
        )
    }
}

/// Compose Euler-ZYX angles back into a unit quaternion.
pub fn euler_zyx_to_quaternion(angles: EulerZyx) -> Quaternion {
    let uq = UnitQuaternion::from_euler_angles(angles.x, angles.y, angles.z);
    let q = uq.quaternion();
    Quaternion::new(q.i, q.j, q.k, q.w)
}

/// Encode a pose into its six state-vector slots: `[px, py, pz, z, y, x]`.
pub fn encode_pose(pose: &Pose) -> [f64; POSE_SLOTS] {
    let [ez, ey, ex] = quaternion_to_euler_zyx(&pose.orientation).to_array();
    [
        pose.position.x,
        pose.position.y,
        pose.position.z,
        ez,
        ey,
        ex,
    ]
}

/// Angle [rad] of the relative rotation between two orientations.
pub fn rotation_distance(a: &Quaternion, b: &Quaternion) -> f64 {
    to_unit_quaternion(a).angle_to(&to_unit_quaternion(b))
}
