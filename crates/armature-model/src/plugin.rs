//! Bevy ECS integration for the arm model.
//!
//! Provides [`ArmModelPlugin`], which ticks every solver in the
//! [`ArmRegistry`] resource with the latest [`TrackedFrame`] each update.
//!
//! # Usage
//!
//! 1. Add [`ArmatureCorePlugin`](armature_core::ArmatureCorePlugin) and
//!    [`ArmModelPlugin`] to your app.
//! 2. Insert a populated [`ArmRegistry`] (for example
//!    [`ArmRegistry::from_rig`]) or register solvers into the default one.
//! 3. Write [`TrackedFrame`] before [`ArmatureSet::Solve`].

use bevy::prelude::*;

use armature_core::ArmatureSet;
use armature_core::types::TrackedFrame;

use crate::registry::ArmRegistry;

/// Bevy plugin that solves every registered arm each frame.
///
/// Systems run in [`ArmatureSet::Solve`], after tracking and before
/// blending.
pub struct ArmModelPlugin;

impl Plugin for ArmModelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArmRegistry>()
            .add_systems(Update, solve_arms_system.in_set(ArmatureSet::Solve));
    }
}

/// Ticks every registered solver with the current tracked frame.
#[allow(clippy::needless_pass_by_value)]
pub fn solve_arms_system(mut registry: ResMut<ArmRegistry>, frame: Res<TrackedFrame>) {
    registry.tick_all(&frame.0);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
