//! Limb segments for skinning or debug meshes.
//!
//! A renderer typically draws the upper arm and forearm as stretched
//! cylinders between joints. [`LimbLayout`] computes where each segment
//! sits, which way it faces, and how far to stretch it, from any
//! [`JointPose`] (a single solver or a blended one).

use nalgebra::{UnitQuaternion, Vector3};

use armature_core::types::{JointPose, JointTransform, up};

use crate::math::look_rotation;

// ---------------------------------------------------------------------------
// LimbConfig
// ---------------------------------------------------------------------------

/// Mesh fitting constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbConfig {
    /// Offset of the drawn wrist along the wrist forward axis.
    pub wrist_offset: f32,
    /// Mesh length per metre of upper arm.
    pub bicep_scale: f32,
    /// Mesh length per metre of forearm.
    pub forearm_scale: f32,
}

impl Default for LimbConfig {
    fn default() -> Self {
        Self {
            wrist_offset: -0.05,
            bicep_scale: 4.4,
            forearm_scale: 3.6,
        }
    }
}

// ---------------------------------------------------------------------------
// LimbSegment
// ---------------------------------------------------------------------------

/// One stretched segment between two joints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbSegment {
    pub midpoint: Vector3<f32>,
    /// Forward axis points back at the parent joint.
    pub rotation: UnitQuaternion<f32>,
    /// Distance between the two joints.
    pub length: f32,
    /// Mesh scale along the forward axis (`length` times the scale factor).
    pub stretch: f32,
}

impl LimbSegment {
    /// Segment from `parent` to `child`, rolled so its up axis leans towards
    /// `up_hint`.
    pub fn between(
        parent: &Vector3<f32>,
        child: &Vector3<f32>,
        up_hint: &Vector3<f32>,
        scale: f32,
    ) -> Self {
        let span = child - parent;
        let midpoint = parent + span * 0.5;
        let length = span.norm();
        Self {
            midpoint,
            rotation: look_rotation(&(parent - midpoint), up_hint),
            length,
            stretch: length * scale,
        }
    }
}

// ---------------------------------------------------------------------------
// LimbLayout
// ---------------------------------------------------------------------------

/// Joint and segment placement for drawing one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbLayout {
    pub shoulder: JointTransform,
    pub elbow: JointTransform,
    /// Wrist pulled back along its forward axis by the configured offset.
    pub wrist: JointTransform,
    pub bicep: LimbSegment,
    pub forearm: LimbSegment,
}

impl LimbLayout {
    pub fn from_pose(pose: &JointPose, config: &LimbConfig) -> Self {
        let shoulder = pose.shoulder;
        let elbow = pose.elbow;
        let wrist = JointTransform::new(
            pose.wrist.position + pose.wrist.forward() * config.wrist_offset,
            pose.wrist.rotation,
        );

        let bicep = LimbSegment::between(
            &shoulder.position,
            &elbow.position,
            &elbow.forward(),
            config.bicep_scale,
        );
        let forearm = LimbSegment::between(
            &elbow.position,
            &wrist.position,
            &(wrist.rotation * up()),
            config.forearm_scale,
        );

        Self {
            shoulder,
            elbow,
            wrist,
            bicep,
            forearm,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
