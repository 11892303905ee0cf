//! Low-pass filter estimating the torso heading from head motion.
//!
//! The torso only follows the gaze while the head is turning fast enough;
//! slow glances leave the body where it is.

use nalgebra::{UnitQuaternion, Vector3};

use armature_core::config::ModelTuning;
use armature_core::types::forward;

use crate::math::{level, rotation_towards, slerp_vector};

// ---------------------------------------------------------------------------
// TorsoState
// ---------------------------------------------------------------------------

/// Persisted torso heading of one solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsoState {
    /// Horizontal unit vector the torso faces.
    pub direction: Vector3<f32>,
    /// Rotation taking [`forward`] onto `direction`.
    pub orientation: UnitQuaternion<f32>,
}

impl Default for TorsoState {
    fn default() -> Self {
        Self {
            direction: forward(),
            orientation: UnitQuaternion::identity(),
        }
    }
}

// ---------------------------------------------------------------------------
// TorsoFilter
// ---------------------------------------------------------------------------

/// Gaze-following filter with a speed-dependent blend strength.
#[derive(Debug, Clone, PartialEq)]
pub struct TorsoFilter {
    state: TorsoState,
    velocity_floor: f32,
    velocity_divisor: f32,
    max_strength: f32,
}

impl Default for TorsoFilter {
    fn default() -> Self {
        Self::from_tuning(&ModelTuning::default())
    }
}

impl TorsoFilter {
    pub fn from_tuning(tuning: &ModelTuning) -> Self {
        Self {
            state: TorsoState::default(),
            velocity_floor: tuning.torso_velocity_floor,
            velocity_divisor: tuning.torso_velocity_divisor,
            max_strength: tuning.torso_max_strength,
        }
    }

    pub const fn state(&self) -> &TorsoState {
        &self.state
    }

    /// Filter strength for a given head angular speed.
    ///
    /// Zero up to the velocity floor, then rising linearly and capped at the
    /// maximum strength.
    pub fn strength(&self, angular_speed: f32) -> f32 {
        ((angular_speed - self.velocity_floor) / self.velocity_divisor).clamp(0.0, self.max_strength)
    }

    /// Pull the torso towards the leveled gaze.
    ///
    /// A gaze with no horizontal component leaves the state untouched.
    pub fn update(&mut self, gaze: &Vector3<f32>, angular_velocity: &Vector3<f32>) -> &TorsoState {
        let Some(leveled) = level(gaze) else {
            tracing::trace!(?gaze, "degenerate gaze, holding torso direction");
            return &self.state;
        };

        let strength = self.strength(angular_velocity.norm());
        if strength > 0.0 {
            let direction = slerp_vector(&self.state.direction, &leveled, strength);
            self.state.direction = direction.try_normalize(crate::math::EPSILON).unwrap_or(direction);
            self.state.orientation = rotation_towards(&self.state.direction);
        }
        &self.state
    }

    /// Face forward again.
    pub fn reset(&mut self) {
        self.state = TorsoState::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
