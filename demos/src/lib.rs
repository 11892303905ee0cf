//! Shared rig definitions and helpers for armature demos.

use bevy::prelude::*;

use armature_core::ArmatureSet;
use armature_core::config::RigConfig;
use armature_core::error::ConfigError;
use armature_transition::TransitionRequests;
use armature_transition::systems::apply_transition_requests;

/// Point and throw postures with the default crossfade tuning.
pub const POINT_THROW_RIG: &str = include_str!("../rigs/point_throw.toml");

/// Parse [`POINT_THROW_RIG`].
pub fn point_throw_rig() -> Result<RigConfig, ConfigError> {
    RigConfig::from_toml_str(POINT_THROW_RIG)
}

// ---------------------------------------------------------------------------
// PostureToggle
// ---------------------------------------------------------------------------

/// Two-posture switch driven by a flag.
///
/// A posture is requested only when the flag changes. The flag starts
/// cleared, so the rig keeps its initial posture until the first change.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct PostureToggle {
    resting: String,
    engaged: String,
    is_engaged: bool,
}

impl PostureToggle {
    pub fn new(resting: impl Into<String>, engaged: impl Into<String>) -> Self {
        Self {
            resting: resting.into(),
            engaged: engaged.into(),
            is_engaged: false,
        }
    }

    /// Toggle between the `point` and `throw` arms.
    pub fn point_throw() -> Self {
        Self::new("point", "throw")
    }

    pub const fn is_engaged(&self) -> bool {
        self.is_engaged
    }

    /// Record the flag; returns the posture to request if it changed.
    pub fn update(&mut self, engaged: bool) -> Option<&str> {
        if engaged == self.is_engaged {
            return None;
        }
        self.is_engaged = engaged;
        Some(if engaged { &self.engaged } else { &self.resting })
    }
}

impl Default for PostureToggle {
    fn default() -> Self {
        Self::point_throw()
    }
}

/// Demo input: whether the user is winding up a throw.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsThrowing(pub bool);

/// Forward changes of [`IsThrowing`] as transition requests.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_posture(
    flag: Res<IsThrowing>,
    mut toggle: ResMut<PostureToggle>,
    mut requests: ResMut<TransitionRequests>,
) {
    if let Some(name) = toggle.update(flag.0) {
        tracing::debug!(arm = name, "posture toggled");
        requests.push(name);
    }
}

/// Adds [`IsThrowing`], a point/throw [`PostureToggle`] and the
/// [`toggle_posture`] system ahead of request processing.
pub struct PostureTogglePlugin;

impl Plugin for PostureTogglePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<IsThrowing>()
            .init_resource::<PostureToggle>()
            .add_systems(
                Update,
                toggle_posture
                    .in_set(ArmatureSet::Blend)
                    .before(apply_transition_requests),
            );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
