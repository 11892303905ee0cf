//! Sequential pose composition.
//!
//! A blended pose starts from the current arm and is pulled towards each
//! queued target in turn, oldest first. Later crossfades therefore act on
//! the result of earlier ones, so a newer request never snaps the arm.

use armature_core::types::{Joint, JointPose, JointTransform};
use armature_model::math::{slerp_rotation, slerp_vector};

/// Interpolate one joint: positions by vector slerp, rotations by
/// quaternion slerp.
pub fn blend_transform(from: &JointTransform, to: &JointTransform, t: f32) -> JointTransform {
    JointTransform::new(
        slerp_vector(&from.position, &to.position, t),
        slerp_rotation(&from.rotation, &to.rotation, t),
    )
}

/// Interpolate every joint of a pose.
pub fn blend_pose(from: &JointPose, to: &JointPose, t: f32) -> JointPose {
    let mut out = *from;
    for joint in Joint::ALL {
        *out.joint_mut(joint) = blend_transform(from.joint(joint), to.joint(joint), t);
    }
    out
}

/// Fold `layers` of `(target, weight)` over `base`, in order.
pub fn compose<'a>(
    base: &JointPose,
    layers: impl IntoIterator<Item = (&'a JointPose, f32)>,
) -> JointPose {
    layers
        .into_iter()
        .fold(*base, |acc, (target, weight)| blend_pose(&acc, target, weight))
}

/// [`compose`] restricted to a single joint.
pub fn compose_joint<'a>(
    base: &JointTransform,
    layers: impl IntoIterator<Item = (&'a JointTransform, f32)>,
) -> JointTransform {
    layers
        .into_iter()
        .fold(*base, |acc, (target, weight)| blend_transform(&acc, target, weight))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
