use nalgebra::{UnitQuaternion, Vector3};

use crate::types::{FrameInput, Joint, JointPose, JointTransform};

// ---------------------------------------------------------------------------
// PoseSolver
// ---------------------------------------------------------------------------

/// Turns one frame of head/controller tracking into a full arm pose.
///
/// Implementations may keep filter state between ticks (the torso direction
/// of the default model) but must not share mutable state with other
/// solvers.
pub trait PoseSolver: Send + Sync + 'static {
    /// Solve the pose for this frame and return it.
    fn tick(&mut self, input: &FrameInput) -> JointPose;

    /// Pose computed by the most recent [`tick`](Self::tick).
    fn pose(&self) -> &JointPose;

    /// Human-readable name for this solver.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn joint(&self, joint: Joint) -> &JointTransform {
        self.pose().joint(joint)
    }

    fn position(&self, joint: Joint) -> Vector3<f32> {
        self.joint(joint).position
    }

    fn rotation(&self, joint: Joint) -> UnitQuaternion<f32> {
        self.joint(joint).rotation
    }

    /// Raw controller transform relative to the head, independent of the
    /// rest of the skeleton.
    fn controller_from_head(&self) -> JointTransform {
        self.pose().controller
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
