//! Smooth switching between arm models.
//!
//! This crate blends the output of several independently configured arm
//! models (for example "point" and "throw") so that changing posture never
//! produces a visible jump:
//!
//! - [`TransitionQueue`]: bounded, ordered crossfades with drop and evict
//!   rules
//! - [`TransitionController`]: current arm plus queue, advanced by `dt`
//!   and composed into one pose
//! - [`ArmRig`]: registry and controller together, for use without an
//!   engine
//! - [`ArmTransitionPlugin`]: Bevy plugin processing [`TransitionRequests`]
//!   and publishing [`BlendedArmPose`]
//!
//! # Example
//!
//! ```no_run
//! use armature_core::config::RigConfig;
//! use armature_core::types::FrameInput;
//! use armature_transition::ArmRig;
//!
//! let mut rig = ArmRig::from_config(&RigConfig::default()).unwrap();
//! rig.request("throw");
//! let pose = rig.tick(1.0 / 72.0, &FrameInput::default());
//! println!("{:?}", pose.controller.position);
//! ```

pub mod blend;
pub mod controller;
pub mod queue;
pub mod rig;
pub mod systems;

use bevy::prelude::*;
use armature_core::ArmatureSet;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use controller::{RequestOutcome, TransitionController};
pub use queue::{TransitionEntry, TransitionPhase, TransitionQueue};
pub use rig::ArmRig;
pub use systems::{BlendedArmPose, TransitionRequests, install_rig};

// ---------------------------------------------------------------------------
// ArmTransitionPlugin
// ---------------------------------------------------------------------------

/// Bevy plugin that crossfades between the arms in
/// [`ArmRegistry`](armature_model::ArmRegistry).
///
/// Requests are applied and progress advanced in [`ArmatureSet::Blend`],
/// after every arm has been solved; the composite pose is written to
/// [`BlendedArmPose`] in [`ArmatureSet::Publish`].
pub struct ArmTransitionPlugin;

impl Plugin for ArmTransitionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<armature_model::ArmRegistry>()
            .init_resource::<TransitionController>()
            .init_resource::<TransitionRequests>()
            .init_resource::<BlendedArmPose>()
            .add_systems(
                Update,
                (
                    systems::apply_transition_requests,
                    systems::advance_transitions,
                )
                    .chain()
                    .in_set(ArmatureSet::Blend),
            )
            .add_systems(
                Update,
                systems::publish_blended_pose.in_set(ArmatureSet::Publish),
            );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ArmRig, ArmTransitionPlugin, BlendedArmPose, RequestOutcome, TransitionController,
        TransitionPhase, TransitionRequests, install_rig,
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::config::RigConfig;
    use armature_core::time::FrameClock;
    use armature_core::types::TrackedFrame;
    use armature_model::{ArmModelPlugin, ArmRegistry};

    #[test]
    fn plugin_builds_without_panic() {
        let mut app = App::new();
        app.add_plugins(armature_core::ArmatureCorePlugin);
        app.add_plugins(ArmTransitionPlugin);
        app.finish();
        app.cleanup();
        app.update();

        assert!(app.world().get_resource::<TransitionController>().is_some());
        assert!(app.world().get_resource::<TransitionRequests>().is_some());
        assert!(app.world().get_resource::<BlendedArmPose>().is_some());
    }

    #[test]
    fn blended_pose_tracks_solved_arm() {
        let mut app = App::new();
        app.add_plugins(armature_core::ArmatureCorePlugin);
        app.insert_resource(FrameClock::fixed(1.0 / 60.0));
        install_rig(app.world_mut(), &RigConfig::default()).unwrap();
        app.add_plugins((ArmModelPlugin, ArmTransitionPlugin));
        app.world_mut().resource_mut::<TrackedFrame>().0.head_position =
            nalgebra::Vector3::new(0.0, 1.6, 0.0);
        app.update();

        let registry = app.world().resource::<ArmRegistry>();
        let point = registry.id("point").unwrap();
        let blended = app.world().resource::<BlendedArmPose>();
        assert_eq!(blended.current, Some(point));
        assert_eq!(blended.pose, *registry.pose(point).unwrap());
        assert!((blended.pose.elbow.position.y - 1.1).abs() < 1e-5);
    }
}
