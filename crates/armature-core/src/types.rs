use std::fmt;

use bevy::prelude::Resource;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Canonical forward axis (+Z). Joint frames use a Y-up, Z-forward basis
/// with +X pointing to the user's right.
pub fn forward() -> Vector3<f32> {
    Vector3::z()
}

/// Canonical up axis (+Y).
pub fn up() -> Vector3<f32> {
    Vector3::y()
}

// ---------------------------------------------------------------------------
// ArmId
// ---------------------------------------------------------------------------

/// Stable handle for an arm model registered in a rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArmId(pub u32);

impl fmt::Display for ArmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arm#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

/// Which hand holds the tracked controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Build from a "left handed" flag.
    pub const fn from_left_flag(is_left_handed: bool) -> Self {
        if is_left_handed { Self::Left } else { Self::Right }
    }

    pub const fn is_left(self) -> bool {
        matches!(self, Self::Left)
    }

    /// Component-wise multiplier mirroring rest geometry across the X axis.
    ///
    /// The first component is exactly `-1.0` (left) or `1.0` (right); the
    /// others are always `1.0`.
    pub fn multiplier(self) -> Vector3<f32> {
        let x = if self.is_left() { -1.0 } else { 1.0 };
        Vector3::new(x, 1.0, 1.0)
    }

    /// Mirror a rest vector for this hand.
    pub fn apply(self, v: &Vector3<f32>) -> Vector3<f32> {
        v.component_mul(&self.multiplier())
    }
}

// ---------------------------------------------------------------------------
// FrameInput
// ---------------------------------------------------------------------------

/// One frame of tracking signal consumed by a pose solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Head position in tracking space.
    pub head_position: Vector3<f32>,
    /// Dominant-hand controller orientation in tracking space.
    pub controller_orientation: UnitQuaternion<f32>,
    /// Head forward vector (head orientation applied to [`forward`]).
    pub gaze_direction: Vector3<f32>,
    /// Head angular velocity. Zero when the device cannot supply it.
    pub angular_velocity: Vector3<f32>,
    pub handedness: Handedness,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            head_position: Vector3::zeros(),
            controller_orientation: UnitQuaternion::identity(),
            gaze_direction: forward(),
            angular_velocity: Vector3::zeros(),
            handedness: Handedness::Right,
        }
    }
}

impl FrameInput {
    /// Build a frame from a head pose, deriving the gaze direction.
    pub fn from_head(
        head_position: Vector3<f32>,
        head_orientation: &UnitQuaternion<f32>,
        controller_orientation: UnitQuaternion<f32>,
    ) -> Self {
        Self {
            head_position,
            controller_orientation,
            gaze_direction: head_orientation * forward(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_head_position(mut self, head_position: Vector3<f32>) -> Self {
        self.head_position = head_position;
        self
    }

    #[must_use]
    pub const fn with_controller(mut self, controller_orientation: UnitQuaternion<f32>) -> Self {
        self.controller_orientation = controller_orientation;
        self
    }

    #[must_use]
    pub const fn with_gaze(mut self, gaze_direction: Vector3<f32>) -> Self {
        self.gaze_direction = gaze_direction;
        self
    }

    #[must_use]
    pub const fn with_angular_velocity(mut self, angular_velocity: Vector3<f32>) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    #[must_use]
    pub const fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }
}

/// Latest tracking frame, written once per update by the tracking stage.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackedFrame(pub FrameInput);

// ---------------------------------------------------------------------------
// Joint / JointTransform / JointPose
// ---------------------------------------------------------------------------

/// The four joints produced by the arm model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Shoulder,
    Elbow,
    Wrist,
    Controller,
}

impl Joint {
    /// All joints, ordered from the body outwards.
    pub const ALL: [Self; 4] = [Self::Shoulder, Self::Elbow, Self::Wrist, Self::Controller];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Shoulder => "shoulder",
            Self::Elbow => "elbow",
            Self::Wrist => "wrist",
            Self::Controller => "controller",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position and rotation of a single joint, relative to the head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTransform {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Default for JointTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl JointTransform {
    /// Zero offset, no rotation.
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), UnitQuaternion::identity())
    }

    pub const fn new(position: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    /// Forward axis of this joint's frame.
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * forward()
    }
}

/// A complete arm pose: every joint relative to the head.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointPose {
    pub shoulder: JointTransform,
    pub elbow: JointTransform,
    pub wrist: JointTransform,
    pub controller: JointTransform,
}

impl JointPose {
    pub const fn joint(&self, joint: Joint) -> &JointTransform {
        match joint {
            Joint::Shoulder => &self.shoulder,
            Joint::Elbow => &self.elbow,
            Joint::Wrist => &self.wrist,
            Joint::Controller => &self.controller,
        }
    }

    pub fn joint_mut(&mut self, joint: Joint) -> &mut JointTransform {
        match joint {
            Joint::Shoulder => &mut self.shoulder,
            Joint::Elbow => &mut self.elbow,
            Joint::Wrist => &mut self.wrist,
            Joint::Controller => &mut self.controller,
        }
    }

    /// Iterate `(joint, transform)` pairs from the body outwards.
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &JointTransform)> {
        Joint::ALL.into_iter().map(move |j| (j, self.joint(j)))
    }

    /// Returns `true` if every component of every joint is finite.
    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, t)| {
            t.position.iter().all(|v| v.is_finite()) && t.rotation.coords.iter().all(|v| v.is_finite())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
