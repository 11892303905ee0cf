//! Stub solvers for registry and transition tests.

use nalgebra::{UnitQuaternion, Vector3};

use armature_core::traits::PoseSolver;
use armature_core::types::{FrameInput, JointPose, JointTransform};

// ---------------------------------------------------------------------------
// FixedPoseSolver
// ---------------------------------------------------------------------------

/// Solver that ignores input and always reports the same pose.
///
/// Counts ticks so tests can check which arms were solved.
#[derive(Debug, Clone, Default)]
pub struct FixedPoseSolver {
    pose: JointPose,
    ticks: usize,
}

impl FixedPoseSolver {
    pub const fn new(pose: JointPose) -> Self {
        Self { pose, ticks: 0 }
    }

    /// Every joint placed at `position` with identity rotation.
    pub fn at(position: Vector3<f32>) -> Self {
        let joint = JointTransform::new(position, UnitQuaternion::identity());
        Self::new(JointPose {
            shoulder: joint,
            elbow: joint,
            wrist: joint,
            controller: joint,
        })
    }

    pub const fn ticks(&self) -> usize {
        self.ticks
    }
}

impl PoseSolver for FixedPoseSolver {
    fn tick(&mut self, _input: &FrameInput) -> JointPose {
        self.ticks += 1;
        self.pose
    }

    fn pose(&self) -> &JointPose {
        &self.pose
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "FixedPoseSolver"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::types::Joint;

    #[test]
    fn fixed_solver_ignores_input() {
        let mut solver = FixedPoseSolver::at(Vector3::new(1.0, 2.0, 3.0));
        let pose = solver.tick(&FrameInput::default());
        assert_eq!(pose.wrist.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(solver.position(Joint::Elbow), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(solver.ticks(), 1);
        assert_eq!(solver.name(), "FixedPoseSolver");
    }
}
