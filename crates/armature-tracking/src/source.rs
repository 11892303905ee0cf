//! Where tracking samples come from.
//!
//! Device integrations implement [`TrackingSource`]. [`StaticTracking`] and
//! [`ScriptedTracking`] are deterministic sources for headless runs and
//! tests.

use std::f64::consts::TAU;

use nalgebra::{UnitQuaternion, Vector3};

use crate::sample::TrackingSample;

// ---------------------------------------------------------------------------
// TrackingSource
// ---------------------------------------------------------------------------

/// Produces a tracking sample for a point in time.
pub trait TrackingSource: Send + Sync {
    /// Sample at `elapsed` seconds since start. `None` when the device has
    /// no fresh reading; the last sample stays in effect.
    fn sample(&mut self, elapsed: f64) -> Option<TrackingSample>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// ---------------------------------------------------------------------------
// StaticTracking
// ---------------------------------------------------------------------------

/// Always returns the same sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticTracking(pub TrackingSample);

impl TrackingSource for StaticTracking {
    fn sample(&mut self, _elapsed: f64) -> Option<TrackingSample> {
        Some(self.0)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "static"
    }
}

// ---------------------------------------------------------------------------
// ScriptedTracking
// ---------------------------------------------------------------------------

/// Seated user glancing left and right while raising and lowering the
/// controller.
///
/// Head yaw and controller pitch follow independent sine waves; the
/// controller also turns with the head. Angles are in degrees, periods in
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedTracking {
    pub head_height: f32,
    pub yaw_amplitude: f32,
    pub yaw_period: f32,
    pub pitch_center: f32,
    pub pitch_amplitude: f32,
    pub pitch_period: f32,
}

impl Default for ScriptedTracking {
    fn default() -> Self {
        Self {
            head_height: 1.6,
            yaw_amplitude: 40.0,
            yaw_period: 4.0,
            pitch_center: 20.0,
            pitch_amplitude: 45.0,
            pitch_period: 3.0,
        }
    }
}

impl ScriptedTracking {
    #[must_use]
    pub const fn with_yaw(mut self, amplitude: f32, period: f32) -> Self {
        self.yaw_amplitude = amplitude;
        self.yaw_period = period;
        self
    }

    #[must_use]
    pub const fn with_pitch(mut self, center: f32, amplitude: f32, period: f32) -> Self {
        self.pitch_center = center;
        self.pitch_amplitude = amplitude;
        self.pitch_period = period;
        self
    }

    /// Sine wave value and its time derivative, in the units of `amplitude`.
    #[allow(clippy::cast_possible_truncation)]
    fn wave(amplitude: f32, period: f32, elapsed: f64) -> (f32, f32) {
        if period <= 0.0 {
            return (0.0, 0.0);
        }
        let omega = TAU / f64::from(period);
        let phase = omega * elapsed;
        let value = f64::from(amplitude) * phase.sin();
        let rate = f64::from(amplitude) * omega * phase.cos();
        (value as f32, rate as f32)
    }

    /// Head yaw (degrees) at `elapsed`.
    pub fn yaw_at(&self, elapsed: f64) -> f32 {
        Self::wave(self.yaw_amplitude, self.yaw_period, elapsed).0
    }

    /// Controller pitch above horizontal (degrees) at `elapsed`.
    pub fn pitch_at(&self, elapsed: f64) -> f32 {
        self.pitch_center + Self::wave(self.pitch_amplitude, self.pitch_period, elapsed).0
    }
}

impl TrackingSource for ScriptedTracking {
    fn sample(&mut self, elapsed: f64) -> Option<TrackingSample> {
        let (yaw, yaw_rate) = Self::wave(self.yaw_amplitude, self.yaw_period, elapsed);
        let pitch = self.pitch_at(elapsed);

        let head = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw.to_radians());
        let raise = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -pitch.to_radians());

        Some(
            TrackingSample::default()
                .with_head_position(Vector3::new(0.0, self.head_height, 0.0))
                .with_head_orientation(head)
                .with_controller(head * raise)
                .with_angular_velocity(Vector3::new(0.0, yaw_rate.to_radians(), 0.0)),
        )
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use armature_core::types::{forward, up};

    #[test]
    fn static_source_repeats_sample() {
        let sample = TrackingSample::default().with_head_position(Vector3::new(0.0, 1.7, 0.0));
        let mut source = StaticTracking(sample);
        assert_eq!(source.sample(0.0), Some(sample));
        assert_eq!(source.sample(12.5), Some(sample));
        assert_eq!(source.name(), "static");
    }

    #[test]
    fn scripted_starts_centered() {
        let mut source = ScriptedTracking::default();
        let sample = source.sample(0.0).unwrap();
        assert_relative_eq!(sample.gaze_direction(), forward(), epsilon = 1e-6);
        assert_relative_eq!(sample.head_position.y, 1.6);
        // Peak yaw rate at t = 0: 40 deg * 2pi / 4 s.
        let expected = (40.0f32 * std::f32::consts::TAU / 4.0).to_radians();
        assert_relative_eq!(sample.angular_velocity.unwrap().y, expected, epsilon = 1e-4);
    }

    #[test]
    fn scripted_yaw_peaks_at_quarter_period() {
        let source = ScriptedTracking::default();
        assert_relative_eq!(source.yaw_at(1.0), 40.0, epsilon = 1e-3);
        assert_relative_eq!(source.yaw_at(3.0), -40.0, epsilon = 1e-3);
    }

    #[test]
    fn scripted_controller_pitch_matches_script() {
        let mut source = ScriptedTracking::default().with_yaw(0.0, 4.0);
        let sample = source.sample(0.75).unwrap();
        let controller_forward = sample.controller_orientation * forward();
        let pitch = 90.0 - controller_forward.angle(&up()).to_degrees();
        assert_relative_eq!(pitch, 65.0, epsilon = 1e-3);
        assert_relative_eq!(source.pitch_at(0.75), 65.0, epsilon = 1e-3);
    }

    #[test]
    fn zero_period_is_still() {
        let mut source = ScriptedTracking::default().with_yaw(30.0, 0.0).with_pitch(10.0, 20.0, 0.0);
        let sample = source.sample(1.3).unwrap();
        assert_relative_eq!(source.pitch_at(1.3), 10.0);
        assert_relative_eq!(sample.angular_velocity.unwrap().norm(), 0.0);
    }
}
