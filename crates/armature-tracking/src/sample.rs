//! Raw tracking samples and their conversion into solver input.

use nalgebra::{UnitQuaternion, Vector3};

use armature_core::types::{FrameInput, Handedness, forward};

// ---------------------------------------------------------------------------
// TrackingSample
// ---------------------------------------------------------------------------

/// One reading from the head and dominant-hand trackers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSample {
    pub head_position: Vector3<f32>,
    pub head_orientation: UnitQuaternion<f32>,
    pub controller_orientation: UnitQuaternion<f32>,
    /// Head angular velocity (rad/s), when the device reports it.
    pub angular_velocity: Option<Vector3<f32>>,
}

impl Default for TrackingSample {
    fn default() -> Self {
        Self {
            head_position: Vector3::zeros(),
            head_orientation: UnitQuaternion::identity(),
            controller_orientation: UnitQuaternion::identity(),
            angular_velocity: None,
        }
    }
}

impl TrackingSample {
    #[must_use]
    pub const fn with_head_position(mut self, head_position: Vector3<f32>) -> Self {
        self.head_position = head_position;
        self
    }

    #[must_use]
    pub const fn with_head_orientation(mut self, head_orientation: UnitQuaternion<f32>) -> Self {
        self.head_orientation = head_orientation;
        self
    }

    #[must_use]
    pub const fn with_controller(mut self, controller_orientation: UnitQuaternion<f32>) -> Self {
        self.controller_orientation = controller_orientation;
        self
    }

    #[must_use]
    pub const fn with_angular_velocity(mut self, angular_velocity: Vector3<f32>) -> Self {
        self.angular_velocity = Some(angular_velocity);
        self
    }

    /// Head forward vector.
    pub fn gaze_direction(&self) -> Vector3<f32> {
        self.head_orientation * forward()
    }

    /// Solver input for this sample. Missing angular velocity reads as zero.
    pub fn to_frame(&self, handedness: Handedness) -> FrameInput {
        FrameInput {
            head_position: self.head_position,
            controller_orientation: self.controller_orientation,
            gaze_direction: self.gaze_direction(),
            angular_velocity: self.angular_velocity.unwrap_or_else(Vector3::zeros),
            handedness,
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
    fn default_sample_maps_to_default_frame() {
        let frame = TrackingSample::default().to_frame(Handedness::Right);
        assert_eq!(frame, FrameInput::default());
    }

    #[test]
    fn gaze_follows_head_orientation() {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -std::f32::consts::FRAC_PI_2);
        let sample = TrackingSample::default().with_head_orientation(yaw);
        assert_relative_eq!(sample.gaze_direction(), Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn missing_angular_velocity_is_zero() {
        let sample = TrackingSample::default();
        assert_eq!(sample.to_frame(Handedness::Left).angular_velocity, Vector3::zeros());

        let sample = sample.with_angular_velocity(Vector3::new(0.0, 1.5, 0.0));
        let frame = sample.to_frame(Handedness::Left);
        assert!((frame.angular_velocity.y - 1.5).abs() < f32::EPSILON);
        assert_eq!(frame.handedness, Handedness::Left);
    }
}
