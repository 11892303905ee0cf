//! Overridable steps of the arm model.
//!
//! [`ArmModel`](crate::solver::ArmModel) composes four strategies:
//!
//! 1. [`ExtensionCurve`] maps controller pitch to an extension ratio.
//! 2. [`RotationSplit`] decides how much of the controller rotation the
//!    wrist takes over from the elbow.
//! 3. [`JointRotationRule`] turns that split into per-joint rotations.
//! 4. [`ChainLayout`] places the joints along the arm.
//!
//! The defaults reproduce the standard neck-pivot and shoulder-pivot arms;
//! variant models swap one step without re-implementing the rest.

use nalgebra::{UnitQuaternion, Vector3};

use armature_core::config::{ArmConfig, ModelTuning};

use crate::math::{rotation_angle_deg, slerp_rotation};

// ---------------------------------------------------------------------------
// Extension curve
// ---------------------------------------------------------------------------

/// Maps controller pitch (degrees above horizontal) to an extension ratio
/// in `[0, 1]`.
pub trait ExtensionCurve: Send + Sync {
    fn ratio(&self, pitch_deg: f32) -> f32;
}

/// Linear ramp between two pitch angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearExtension {
    pub min_angle: f32,
    pub max_angle: f32,
}

impl LinearExtension {
    pub const fn new(min_angle: f32, max_angle: f32) -> Self {
        Self {
            min_angle,
            max_angle,
        }
    }

    pub const fn from_tuning(tuning: &ModelTuning) -> Self {
        Self::new(tuning.min_extension_angle, tuning.max_extension_angle)
    }
}

impl Default for LinearExtension {
    fn default() -> Self {
        Self::from_tuning(&ModelTuning::default())
    }
}

impl ExtensionCurve for LinearExtension {
    fn ratio(&self, pitch_deg: f32) -> f32 {
        let span = self.max_angle - self.min_angle;
        if span <= 0.0 {
            return if pitch_deg >= self.max_angle { 1.0 } else { 0.0 };
        }
        ((pitch_deg - self.min_angle) / span).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Rotation split
// ---------------------------------------------------------------------------

/// Chooses the rotation handed to the wrist, given the no-roll controller
/// rotation (`xy`) and the current extension ratio.
pub trait RotationSplit: Send + Sync {
    fn lerp_rotation(&self, xy: &UnitQuaternion<f32>, extension_ratio: f32)
    -> UnitQuaternion<f32>;
}

/// Bend-ratio split, suppressed as the controller turns away from forward.
///
/// Near a half turn the wrist share vanishes so the elbow does not flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuppressedSplit {
    pub elbow_bend_ratio: f32,
    pub extension_weight: f32,
}

impl SuppressedSplit {
    pub const fn new(elbow_bend_ratio: f32, extension_weight: f32) -> Self {
        Self {
            elbow_bend_ratio,
            extension_weight,
        }
    }

    pub const fn from_config(config: &ArmConfig) -> Self {
        Self::new(config.elbow_bend_ratio, config.tuning.extension_weight)
    }

    /// `1 - (angle / 180)^6`, for an angle in degrees.
    pub fn suppression(total_angle_deg: f32) -> f32 {
        1.0 - (total_angle_deg / 180.0).powi(6)
    }

    /// Interpolation factor from identity towards `xy` for the wrist.
    pub fn lerp_value(&self, xy: &UnitQuaternion<f32>, extension_ratio: f32) -> f32 {
        let total = rotation_angle_deg(xy, &UnitQuaternion::identity());
        let bend = self.elbow_bend_ratio;
        let base = (1.0 - bend) + bend * extension_ratio * self.extension_weight;
        (base * Self::suppression(total)).clamp(0.0, 1.0)
    }
}

impl Default for SuppressedSplit {
    fn default() -> Self {
        Self::from_config(&ArmConfig::default())
    }
}

impl RotationSplit for SuppressedSplit {
    fn lerp_rotation(
        &self,
        xy: &UnitQuaternion<f32>,
        extension_ratio: f32,
    ) -> UnitQuaternion<f32> {
        slerp_rotation(
            &UnitQuaternion::identity(),
            xy,
            self.lerp_value(xy, extension_ratio),
        )
    }
}

// ---------------------------------------------------------------------------
// Joint rotations
// ---------------------------------------------------------------------------

/// Rotations available to a [`JointRotationRule`] for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationInputs {
    /// Filtered torso orientation.
    pub torso: UnitQuaternion<f32>,
    /// Controller orientation as tracked.
    pub controller: UnitQuaternion<f32>,
    /// Controller orientation relative to the torso.
    pub relative: UnitQuaternion<f32>,
    /// No-roll rotation from forward onto the relative controller forward.
    pub xy: UnitQuaternion<f32>,
    /// Share of `xy` handed to the wrist.
    pub lerp: UnitQuaternion<f32>,
}

/// Final orientation of each moving joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointRotations {
    pub elbow: UnitQuaternion<f32>,
    pub wrist: UnitQuaternion<f32>,
    pub controller: UnitQuaternion<f32>,
}

pub trait JointRotationRule: Send + Sync {
    fn rotations(&self, inputs: &RotationInputs) -> JointRotations;
}

/// Elbow takes what the wrist does not; the controller keeps its tracked
/// orientation expressed through the torso.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitRotations;

impl JointRotationRule for SplitRotations {
    fn rotations(&self, inputs: &RotationInputs) -> JointRotations {
        JointRotations {
            elbow: inputs.torso * inputs.lerp.inverse() * inputs.xy,
            wrist: inputs.controller * inputs.lerp,
            controller: inputs.torso * inputs.relative,
        }
    }
}

// ---------------------------------------------------------------------------
// Chain layout
// ---------------------------------------------------------------------------

/// Everything a [`ChainLayout`] needs to place the joints.
///
/// Rest offsets are already mirrored for the active hand, and the elbow
/// already carries the extension offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainInputs {
    pub neck: Vector3<f32>,
    pub torso: UnitQuaternion<f32>,
    pub pivot_offset: Vector3<f32>,
    pub elbow: Vector3<f32>,
    pub wrist: Vector3<f32>,
    pub controller: Vector3<f32>,
    pub rotations: JointRotations,
}

/// Joint positions produced by a [`ChainLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainPositions {
    pub elbow: Vector3<f32>,
    pub wrist: Vector3<f32>,
    pub controller: Vector3<f32>,
}

pub trait ChainLayout: Send + Sync {
    fn place(&self, inputs: &ChainInputs) -> ChainPositions;
}

/// Upper arm hangs from the neck; each joint is rotated by its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeckPivotChain;

impl ChainLayout for NeckPivotChain {
    fn place(&self, inputs: &ChainInputs) -> ChainPositions {
        let elbow = inputs.neck + inputs.torso * inputs.elbow;
        let wrist = elbow + inputs.rotations.elbow * inputs.wrist;
        let controller = wrist + inputs.rotations.wrist * inputs.controller;
        ChainPositions {
            elbow,
            wrist,
            controller,
        }
    }
}

/// Elbow swings around a pivot near the shoulder; the controller sits at a
/// fixed offset from a rigid wrist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShoulderPivotChain;

impl ChainLayout for ShoulderPivotChain {
    fn place(&self, inputs: &ChainInputs) -> ChainPositions {
        let pivot = inputs.neck + inputs.torso * inputs.pivot_offset;
        let elbow = pivot + inputs.rotations.elbow * inputs.elbow;
        let wrist = elbow + inputs.rotations.wrist * inputs.wrist;
        let controller = wrist + inputs.controller;
        ChainPositions {
            elbow,
            wrist,
            controller,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_extension_bounds() {
        let curve = LinearExtension::default();
        assert!(curve.ratio(-30.0).abs() < f32::EPSILON);
        assert!(curve.ratio(7.0).abs() < f32::EPSILON);
        assert!((curve.ratio(60.0) - 1.0).abs() < f32::EPSILON);
        assert!((curve.ratio(90.0) - 1.0).abs() < f32::EPSILON);
        assert_relative_eq!(curve.ratio(33.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn linear_extension_strictly_increasing_inside_range() {
        let curve = LinearExtension::default();
        let mut previous = curve.ratio(7.0);
        for step in 1..=53 {
            let ratio = curve.ratio(7.0 + step as f32);
            assert!(ratio > previous, "not increasing at {step}");
            previous = ratio;
        }
    }

    #[test]
    fn linear_extension_degenerate_range_is_a_step() {
        let curve = LinearExtension::new(30.0, 30.0);
        assert!(curve.ratio(29.0).abs() < f32::EPSILON);
        assert!((curve.ratio(30.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn suppression_curve() {
        assert!((SuppressedSplit::suppression(0.0) - 1.0).abs() < f32::EPSILON);
        assert!(SuppressedSplit::suppression(180.0).abs() < f32::EPSILON);
        assert_relative_eq!(SuppressedSplit::suppression(90.0), 1.0 - 1.0 / 64.0);
    }

    #[test]
    fn lerp_value_at_identity_is_unbent_share() {
        let split = SuppressedSplit::new(0.6, 0.4);
        let identity = UnitQuaternion::identity();
        assert_relative_eq!(split.lerp_value(&identity, 0.0), 0.4, epsilon = 1e-6);
        assert_relative_eq!(split.lerp_value(&identity, 1.0), 0.4 + 0.24, epsilon = 1e-6);
    }

    #[test]
    fn lerp_rotation_scales_xy() {
        let split = SuppressedSplit::new(0.6, 0.4);
        let xy = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.5);
        let lerp = split.lerp_rotation(&xy, 0.0);
        let expected = 0.5 * split.lerp_value(&xy, 0.0);
        assert_relative_eq!(lerp.angle(), expected, epsilon = 1e-5);
    }

    #[test]
    fn zero_bend_hands_everything_to_wrist() {
        let split = SuppressedSplit::new(0.0, 0.4);
        let xy = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3);
        let rotations = SplitRotations.rotations(&RotationInputs {
            torso: UnitQuaternion::identity(),
            controller: xy,
            relative: xy,
            xy,
            lerp: split.lerp_rotation(&xy, 0.0),
        });
        assert_relative_eq!(rotations.elbow.angle(), 0.0, epsilon = 1e-3);
    }

    fn identity_rotations() -> JointRotations {
        JointRotations {
            elbow: UnitQuaternion::identity(),
            wrist: UnitQuaternion::identity(),
            controller: UnitQuaternion::identity(),
        }
    }

    fn chain_inputs() -> ChainInputs {
        ChainInputs {
            neck: Vector3::new(0.0, 1.6, 0.0),
            torso: UnitQuaternion::identity(),
            pivot_offset: Vector3::zeros(),
            elbow: Vector3::new(0.195, -0.5, 0.005),
            wrist: Vector3::new(0.0, 0.0, 0.25),
            controller: Vector3::new(0.0, 0.0, 0.05),
            rotations: identity_rotations(),
        }
    }

    #[test]
    fn neck_chain_sums_rests_at_identity() {
        let p = NeckPivotChain.place(&chain_inputs());
        assert_relative_eq!(p.elbow, Vector3::new(0.195, 1.1, 0.005), epsilon = 1e-6);
        assert_relative_eq!(p.wrist, Vector3::new(0.195, 1.1, 0.255), epsilon = 1e-6);
        assert_relative_eq!(p.controller, Vector3::new(0.195, 1.1, 0.305), epsilon = 1e-6);
    }

    #[test]
    fn shoulder_chain_keeps_controller_offset_unrotated() {
        let mut inputs = chain_inputs();
        let quarter = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2);
        inputs.rotations.wrist = quarter;
        inputs.rotations.elbow = quarter;
        let p = ShoulderPivotChain.place(&inputs);
        assert_relative_eq!(p.controller - p.wrist, inputs.controller, epsilon = 1e-6);
        assert_relative_eq!(p.elbow - inputs.neck, quarter * inputs.elbow, epsilon = 1e-6);
    }

    #[test]
    fn shoulder_chain_applies_pivot_offset_through_torso() {
        let mut inputs = chain_inputs();
        inputs.pivot_offset = Vector3::new(0.1, 0.0, 0.0);
        inputs.torso = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI);
        let with_offset = ShoulderPivotChain.place(&inputs);
        inputs.pivot_offset = Vector3::zeros();
        let without = ShoulderPivotChain.place(&inputs);
        assert_relative_eq!(
            with_offset.elbow - without.elbow,
            Vector3::new(-0.1, 0.0, 0.0),
            epsilon = 1e-6
        );
    }
}
