//! Vector and rotation helpers shared by the arm model and the blender.
//!
//! Angles crossing this module's API are in degrees, matching the tuning
//! constants of the arm model.

use nalgebra::{Unit, UnitQuaternion, Vector3};

use armature_core::types::{forward, up};

/// Lengths below this are treated as zero.
pub const EPSILON: f32 = 1e-6;

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Unit axis perpendicular to `v`, preferring the component of +Y
/// orthogonal to `v` so horizontal vectors turn about the vertical.
pub fn orthogonal_axis(v: &Vector3<f32>) -> Unit<Vector3<f32>> {
    let up = up();
    let candidate = up - v * v.dot(&up) / v.norm_squared().max(EPSILON);
    Unit::try_new(candidate, EPSILON)
        .or_else(|| Unit::try_new(v.cross(&Vector3::x()), EPSILON))
        .unwrap_or_else(Vector3::z_axis)
}

/// Shortest rotation taking direction `from` onto direction `to`.
///
/// Opposite directions produce a half turn about [`orthogonal_axis`].
/// A zero-length input yields the identity.
pub fn from_to_rotation(from: &Vector3<f32>, to: &Vector3<f32>) -> UnitQuaternion<f32> {
    UnitQuaternion::rotation_between(from, to).unwrap_or_else(|| {
        UnitQuaternion::from_axis_angle(&orthogonal_axis(from), std::f32::consts::PI)
    })
}

/// Rotation taking [`forward`] onto `direction`, with no roll about it.
pub fn rotation_towards(direction: &Vector3<f32>) -> UnitQuaternion<f32> {
    from_to_rotation(&forward(), direction)
}

/// Unsigned angle between two vectors, in degrees.
pub fn angle_between_deg(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    a.angle(b).to_degrees()
}

/// Angular distance between two rotations, in degrees within `[0, 180]`.
pub fn rotation_angle_deg(a: &UnitQuaternion<f32>, b: &UnitQuaternion<f32>) -> f32 {
    a.angle_to(b).to_degrees()
}

/// Spherical interpolation between rotations with `t` clamped to `[0, 1]`.
///
/// Falls back to normalized lerp when the pair is too close for slerp to
/// pick a plane.
pub fn slerp_rotation(
    a: &UnitQuaternion<f32>,
    b: &UnitQuaternion<f32>,
    t: f32,
) -> UnitQuaternion<f32> {
    let t = t.clamp(0.0, 1.0);
    a.try_slerp(b, t, EPSILON).unwrap_or_else(|| a.nlerp(b, t))
}

/// Spherical interpolation between two vectors treated as directions with
/// magnitudes.
///
/// The direction turns through the angle between `a` and `b` while the
/// length is interpolated linearly. Zero-length or parallel inputs degrade
/// to a straight lerp; opposite directions turn about [`orthogonal_axis`].
pub fn slerp_vector(a: &Vector3<f32>, b: &Vector3<f32>, t: f32) -> Vector3<f32> {
    let t = t.clamp(0.0, 1.0);
    let (Some(dir_a), Some(dir_b)) = (Unit::try_new(*a, EPSILON), Unit::try_new(*b, EPSILON))
    else {
        return a.lerp(b, t);
    };

    let angle = dir_a.angle(&dir_b);
    if angle < EPSILON {
        return a.lerp(b, t);
    }

    let axis = Unit::try_new(dir_a.cross(&dir_b), EPSILON)
        .unwrap_or_else(|| orthogonal_axis(&dir_a));
    let turn = UnitQuaternion::from_axis_angle(&axis, angle * t);
    let length = lerp_clamped(a.norm(), b.norm(), t);
    (turn * dir_a.into_inner()) * length
}

/// Project onto the horizontal plane and normalize.
///
/// Returns `None` when nothing is left after removing the vertical
/// component (zero input or a vector pointing straight up or down).
pub fn level(v: &Vector3<f32>) -> Option<Unit<Vector3<f32>>> {
    Unit::try_new(Vector3::new(v.x, 0.0, v.z), EPSILON)
}

/// Rotation whose forward axis points along `direction`, rolled so that its
/// up axis leans towards `up_hint`.
///
/// Falls back to [`rotation_towards`] when `direction` is parallel to the hint.
pub fn look_rotation(direction: &Vector3<f32>, up_hint: &Vector3<f32>) -> UnitQuaternion<f32> {
    if direction.cross(up_hint).norm() < EPSILON {
        return rotation_towards(direction);
    }
    UnitQuaternion::face_towards(direction, up_hint)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
