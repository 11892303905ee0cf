//! Canned tracking frames.
//!
//! Pitch is degrees above horizontal, yaw degrees to the right. Both use the
//! Y-up, Z-forward frame the solver expects.

use nalgebra::{UnitQuaternion, Vector3};

use armature_core::types::{FrameInput, Handedness};

/// Head height used by every fixture.
pub const HEAD_HEIGHT: f32 = 1.6;

/// Head level and facing forward, controller pointing straight ahead.
pub fn neutral_frame(handedness: Handedness) -> FrameInput {
    FrameInput::default()
        .with_head_position(Vector3::new(0.0, HEAD_HEIGHT, 0.0))
        .with_handedness(handedness)
}

/// Neutral head with the controller raised by `pitch_deg`.
pub fn pitched_frame(pitch_deg: f32, handedness: Handedness) -> FrameInput {
    let raise = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -pitch_deg.to_radians());
    neutral_frame(handedness).with_controller(raise)
}

/// Head and controller both turned by `yaw_deg`.
pub fn turned_frame(yaw_deg: f32, handedness: Handedness) -> FrameInput {
    let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_deg.to_radians());
    FrameInput::from_head(Vector3::new(0.0, HEAD_HEIGHT, 0.0), &yaw, yaw)
        .with_handedness(handedness)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
