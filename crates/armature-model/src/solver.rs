//! Analytic arm model turning head and controller tracking into a pose.
//!
//! No iteration and no joint limits: every joint is placed in closed form
//! from the controller pitch, a torso estimate and a handful of rest
//! offsets. See [`crate::strategy`] for the swappable steps.

use std::fmt;

use nalgebra::{UnitQuaternion, Vector3};

use armature_core::config::ArmConfig;
use armature_core::error::ConfigError;
use armature_core::traits::PoseSolver;
use armature_core::types::{FrameInput, JointPose, JointTransform, forward, up};

use crate::math::{angle_between_deg, rotation_towards};
use crate::strategy::{
    ChainInputs, ChainLayout, ExtensionCurve, JointRotationRule, LinearExtension, NeckPivotChain,
    RotationInputs, RotationSplit, ShoulderPivotChain, SplitRotations, SuppressedSplit,
};
use crate::torso::{TorsoFilter, TorsoState};

// ---------------------------------------------------------------------------
// SolveTrace
// ---------------------------------------------------------------------------

/// Intermediate values of the most recent tick, for inspection and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveTrace {
    /// Controller pitch above horizontal, relative to the torso (degrees).
    pub pitch_deg: f32,
    /// Output of the extension curve.
    pub extension_ratio: f32,
    /// Angle of the rotation handed to the wrist (degrees).
    pub wrist_share_deg: f32,
}

// ---------------------------------------------------------------------------
// ArmModel
// ---------------------------------------------------------------------------

/// The default [`PoseSolver`].
///
/// Holds its own torso filter, so distinct instances fed the same frames
/// stay independent.
pub struct ArmModel {
    name: String,
    config: ArmConfig,
    torso: TorsoFilter,
    extension: Box<dyn ExtensionCurve>,
    split: Box<dyn RotationSplit>,
    rotations: Box<dyn JointRotationRule>,
    chain: Box<dyn ChainLayout>,
    neck: Vector3<f32>,
    trace: SolveTrace,
    pose: JointPose,
}

impl fmt::Debug for ArmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArmModel")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("torso", self.torso.state())
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl Default for ArmModel {
    fn default() -> Self {
        Self::new(ArmConfig::default())
    }
}

impl ArmModel {
    /// Build a model with the default strategies for `config`.
    ///
    /// `shoulder_pivot` selects [`ShoulderPivotChain`]; otherwise the arm
    /// hangs from the neck.
    pub fn new(config: ArmConfig) -> Self {
        let chain: Box<dyn ChainLayout> = if config.shoulder_pivot {
            Box::new(ShoulderPivotChain)
        } else {
            Box::new(NeckPivotChain)
        };
        Self {
            name: String::from("arm_model"),
            torso: TorsoFilter::from_tuning(&config.tuning),
            extension: Box::new(LinearExtension::from_tuning(&config.tuning)),
            split: Box::new(SuppressedSplit::from_config(&config)),
            rotations: Box::new(SplitRotations),
            chain,
            neck: Vector3::zeros(),
            trace: SolveTrace::default(),
            pose: JointPose::default(),
            config,
        }
    }

    /// Validate `config` before building.
    pub fn try_new(config: ArmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_extension_curve(mut self, curve: impl ExtensionCurve + 'static) -> Self {
        self.extension = Box::new(curve);
        self
    }

    #[must_use]
    pub fn with_rotation_split(mut self, split: impl RotationSplit + 'static) -> Self {
        self.split = Box::new(split);
        self
    }

    #[must_use]
    pub fn with_joint_rotations(mut self, rule: impl JointRotationRule + 'static) -> Self {
        self.rotations = Box::new(rule);
        self
    }

    #[must_use]
    pub fn with_chain(mut self, chain: impl ChainLayout + 'static) -> Self {
        self.chain = Box::new(chain);
        self
    }

    pub const fn config(&self) -> &ArmConfig {
        &self.config
    }

    pub const fn torso(&self) -> &TorsoState {
        self.torso.state()
    }

    /// Neck position from the latest tick (the head position).
    pub const fn neck_position(&self) -> Vector3<f32> {
        self.neck
    }

    pub const fn last_trace(&self) -> &SolveTrace {
        &self.trace
    }

    /// Forget the torso heading and the last pose.
    pub fn reset(&mut self) {
        self.torso.reset();
        self.neck = Vector3::zeros();
        self.trace = SolveTrace::default();
        self.pose = JointPose::default();
    }

    /// Controller pitch above the horizontal and the no-roll rotation onto
    /// the controller forward, both relative to the torso.
    fn controller_pitch(relative: &UnitQuaternion<f32>) -> (f32, UnitQuaternion<f32>) {
        let controller_forward = relative * forward();
        let pitch = 90.0 - angle_between_deg(&controller_forward, &up());
        (pitch, rotation_towards(&controller_forward))
    }
}

impl PoseSolver for ArmModel {
    fn tick(&mut self, input: &FrameInput) -> JointPose {
        let hand = input.handedness;
        let controller = input.controller_orientation;
        let torso = self
            .torso
            .update(&input.gaze_direction, &input.angular_velocity)
            .orientation;
        self.neck = input.head_position;

        let mut elbow = hand.apply(&self.config.elbow_rest());
        let wrist = hand.apply(&self.config.wrist_rest());
        let controller_rest = hand.apply(&self.config.controller_rest());

        let relative = torso.inverse() * controller;
        let (pitch, xy) = Self::controller_pitch(&relative);

        let extension_ratio = self.extension.ratio(pitch);
        elbow += hand.apply(&self.config.extension_offset()) * extension_ratio;

        let lerp = self.split.lerp_rotation(&xy, extension_ratio);
        let rotations = self.rotations.rotations(&RotationInputs {
            torso,
            controller,
            relative,
            xy,
            lerp,
        });

        let positions = self.chain.place(&ChainInputs {
            neck: self.neck,
            torso,
            pivot_offset: self.config.pivot_offset(),
            elbow,
            wrist,
            controller: controller_rest,
            rotations,
        });

        let shoulder = self.neck + torso * hand.apply(&self.config.tuning.shoulder_rest());
        self.pose = JointPose {
            shoulder: JointTransform::new(shoulder, torso),
            elbow: JointTransform::new(positions.elbow, rotations.elbow),
            wrist: JointTransform::new(positions.wrist, rotations.wrist),
            controller: JointTransform::new(positions.controller, rotations.controller),
        };
        self.trace = SolveTrace {
            pitch_deg: pitch,
            extension_ratio,
            wrist_share_deg: lerp.angle().to_degrees(),
        };
        self.pose
    }

    fn pose(&self) -> &JointPose {
        &self.pose
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use armature_core::types::{Handedness, Joint};

    fn head() -> Vector3<f32> {
        Vector3::new(0.0, 1.6, 0.0)
    }

    fn neutral(handedness: Handedness) -> FrameInput {
        FrameInput::default()
            .with_head_position(head())
            .with_handedness(handedness)
    }

    /// Controller raised `deg` degrees above horizontal.
    fn pitched(deg: f32) -> UnitQuaternion<f32> {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -deg.to_radians())
    }

    #[test]
    fn neutral_pose_right_hand() {
        let mut model = ArmModel::default();
        let pose = model.tick(&neutral(Handedness::Right));

        let elbow = head() + Vector3::new(0.195, -0.5, 0.005);
        let wrist = elbow + Vector3::new(0.0, 0.0, 0.25);
        let controller = wrist + Vector3::new(0.0, 0.0, 0.05);
        assert_relative_eq!(pose.elbow.position, elbow, epsilon = 1e-6);
        assert_relative_eq!(pose.wrist.position, wrist, epsilon = 1e-6);
        assert_relative_eq!(pose.controller.position, controller, epsilon = 1e-6);
        assert_relative_eq!(
            pose.shoulder.position,
            head() + Vector3::new(0.17, -0.2, -0.03),
            epsilon = 1e-6
        );
        for (_, joint) in pose.iter() {
            assert_relative_eq!(joint.rotation.angle(), 0.0, epsilon = 1e-3);
        }
        assert!(model.last_trace().extension_ratio.abs() < f32::EPSILON);
    }

    #[test]
    fn neutral_pose_left_hand_mirrors_x() {
        let mut right = ArmModel::default();
        let mut left = ArmModel::default();
        let r = right.tick(&neutral(Handedness::Right));
        let l = left.tick(&neutral(Handedness::Left));

        for joint in Joint::ALL {
            let rp = r.joint(joint).position;
            let lp = l.joint(joint).position;
            assert_relative_eq!(lp.x, -rp.x, epsilon = 1e-6);
            assert_relative_eq!(lp.y, rp.y, epsilon = 1e-6);
            assert_relative_eq!(lp.z, rp.z, epsilon = 1e-6);
        }
    }

    #[test]
    fn seventy_degree_pitch_saturates_extension() {
        let mut model = ArmModel::default();
        let input = neutral(Handedness::Right).with_controller(pitched(70.0));
        let pose = model.tick(&input);

        let trace = model.last_trace();
        assert_relative_eq!(trace.pitch_deg, 70.0, epsilon = 1e-3);
        assert!((trace.extension_ratio - 1.0).abs() < f32::EPSILON);

        // Neck chain with an identity torso: elbow carries the full offset.
        let elbow = head() + Vector3::new(0.195 - 0.13, -0.5 + 0.14, 0.005 + 0.08);
        assert_relative_eq!(pose.elbow.position, elbow, epsilon = 1e-5);
    }

    #[test]
    fn extension_ratio_non_decreasing_in_pitch() {
        let mut model = ArmModel::default();
        let mut previous = -1.0;
        for deg in (-80..=80).step_by(5) {
            model.tick(&neutral(Handedness::Right).with_controller(pitched(deg as f32)));
            let ratio = model.last_trace().extension_ratio;
            assert!((0.0..=1.0).contains(&ratio));
            assert!(ratio >= previous, "ratio dropped at {deg} degrees");
            previous = ratio;
        }
    }

    #[test]
    fn rotation_split_between_elbow_and_wrist() {
        let mut model = ArmModel::default();
        let pose = model.tick(&neutral(Handedness::Right).with_controller(pitched(70.0)));

        // 0.64 of the pitch, suppressed by (70/180)^6, goes to the wrist share.
        let share = 0.64 * (1.0 - (70.0f32 / 180.0).powi(6));
        assert_relative_eq!(model.last_trace().wrist_share_deg, 70.0 * share, epsilon = 1e-2);
        assert_relative_eq!(
            pose.elbow.rotation.angle().to_degrees(),
            70.0 * (1.0 - share),
            epsilon = 1e-2
        );
        // Controller keeps the tracked orientation under an identity torso.
        assert_relative_eq!(pose.controller.rotation.angle_to(&pitched(70.0)), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn shoulder_pivot_keeps_controller_offset_rigid() {
        let mut model = ArmModel::new(ArmConfig::throwing());
        let input = neutral(Handedness::Right)
            .with_controller(UnitQuaternion::from_euler_angles(-0.4, 0.7, 0.2));
        let pose = model.tick(&input);

        assert_relative_eq!(
            pose.controller.position - pose.wrist.position,
            Vector3::new(0.0, 0.0, 0.05),
            epsilon = 1e-6
        );
        let ratio = model.last_trace().extension_ratio;
        let elbow_offset =
            model.config().elbow_rest() + model.config().extension_offset() * ratio;
        assert_relative_eq!(
            pose.elbow.position - head(),
            pose.elbow.rotation * elbow_offset,
            epsilon = 1e-5
        );
    }

    #[test]
    fn shoulder_accessor_follows_torso() {
        let mut model = ArmModel::default();
        let turn = FrameInput::default()
            .with_gaze(Vector3::x())
            .with_angular_velocity(Vector3::new(0.0, 50.0, 0.0));
        for _ in 0..300 {
            model.tick(&turn);
        }
        let pose = model.pose();
        assert_relative_eq!(model.torso().direction, Vector3::x(), epsilon = 1e-3);
        // Right shoulder of a body facing +X sits towards -Z.
        assert!(pose.shoulder.position.z < -0.1);
        assert_relative_eq!(pose.shoulder.forward(), Vector3::x(), epsilon = 1e-3);
    }

    #[test]
    fn independent_instances_keep_separate_torsos() {
        let mut a = ArmModel::default();
        let b = ArmModel::default();
        a.tick(
            &FrameInput::default()
                .with_gaze(Vector3::x())
                .with_angular_velocity(Vector3::new(0.0, 50.0, 0.0)),
        );
        assert!(a.torso().direction.x > 0.0);
        assert_relative_eq!(b.torso().direction, forward());
    }

    #[test]
    fn degenerate_gaze_produces_finite_pose() {
        let mut model = ArmModel::default();
        let pose = model.tick(
            &FrameInput::default()
                .with_gaze(Vector3::zeros())
                .with_angular_velocity(Vector3::new(9.0, 9.0, 9.0)),
        );
        assert!(pose.is_finite());
        assert_relative_eq!(model.torso().direction, forward());
    }

    #[test]
    fn accessors_and_reset() {
        let mut model = ArmModel::default().with_name("point");
        model.tick(&neutral(Handedness::Right));
        assert_eq!(PoseSolver::name(&model), "point");
        assert_relative_eq!(model.neck_position(), head());
        assert_eq!(model.controller_from_head(), model.pose().controller);

        model.reset();
        assert_eq!(*model.pose(), JointPose::default());
        assert_eq!(model.neck_position(), Vector3::zeros());
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let cfg = ArmConfig::default().with_elbow_bend_ratio(2.0);
        assert!(matches!(
            ArmModel::try_new(cfg),
            Err(ConfigError::InvalidBendRatio(_))
        ));
    }

    struct Straight;

    impl ExtensionCurve for Straight {
        fn ratio(&self, _pitch_deg: f32) -> f32 {
            1.0
        }
    }

    #[test]
    fn custom_extension_curve_is_used() {
        let mut model = ArmModel::default().with_extension_curve(Straight);
        let pose = model.tick(&neutral(Handedness::Right));
        assert!((model.last_trace().extension_ratio - 1.0).abs() < f32::EPSILON);
        assert_relative_eq!(
            pose.elbow.position,
            head() + Vector3::new(0.065, -0.36, 0.085),
            epsilon = 1e-5
        );
    }
}
