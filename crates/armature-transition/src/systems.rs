//! Bevy resources and systems driving crossfades each frame.

use bevy::prelude::*;

use armature_core::config::RigConfig;
use armature_core::error::ConfigError;
use armature_core::time::FrameClock;
use armature_core::types::{ArmId, JointPose};
use armature_model::registry::ArmRegistry;

use crate::controller::TransitionController;
use crate::rig::ArmRig;

// ---------------------------------------------------------------------------
// TransitionRequests
// ---------------------------------------------------------------------------

/// Arm names to crossfade to, applied in order at the start of
/// [`ArmatureSet::Blend`](armature_core::ArmatureSet::Blend).
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionRequests {
    pending: Vec<String>,
}

impl TransitionRequests {
    pub fn push(&mut self, name: impl Into<String>) {
        self.pending.push(name.into());
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn drain(&mut self) -> std::vec::Drain<'_, String> {
        self.pending.drain(..)
    }
}

// ---------------------------------------------------------------------------
// BlendedArmPose
// ---------------------------------------------------------------------------

/// Composite pose published for renderers once per frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct BlendedArmPose {
    pub pose: JointPose,
    pub current: Option<ArmId>,
    pub transitioning: bool,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Resolve queued names against the registry and request each crossfade.
///
/// Unknown names are logged and skipped.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_transition_requests(
    mut requests: ResMut<TransitionRequests>,
    registry: Res<ArmRegistry>,
    mut controller: ResMut<TransitionController>,
) {
    if requests.is_empty() {
        return;
    }
    for name in requests.drain() {
        let target = registry.id(&name);
        if target.is_none() {
            tracing::warn!(%name, "transition to unknown arm ignored");
        }
        controller.request_transition(target);
    }
}

/// Advance crossfades by this frame's delta.
#[allow(clippy::needless_pass_by_value)]
pub fn advance_transitions(clock: Res<FrameClock>, mut controller: ResMut<TransitionController>) {
    controller.tick(clock.delta());
}

/// Compose the blended pose from the solved arms.
#[allow(clippy::needless_pass_by_value)]
pub fn publish_blended_pose(
    registry: Res<ArmRegistry>,
    controller: Res<TransitionController>,
    mut blended: ResMut<BlendedArmPose>,
) {
    *blended = BlendedArmPose {
        pose: controller.pose(&registry),
        current: controller.current(),
        transitioning: controller.is_transitioning(),
    };
}

// ---------------------------------------------------------------------------
// Rig installation
// ---------------------------------------------------------------------------

/// Build a rig from `config` and insert its registry and controller.
pub fn install_rig(world: &mut World, config: &RigConfig) -> Result<(), ConfigError> {
    let (registry, controller) = ArmRig::from_config(config)?.into_parts();
    tracing::info!(arms = registry.len(), "installed arm rig");
    world.insert_resource(registry);
    world.insert_resource(controller);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
