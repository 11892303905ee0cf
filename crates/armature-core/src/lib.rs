//! Shared types, traits, configuration and errors for the armature arm model.
//!
//! Every other armature crate builds on the types defined here:
//!
//! - [`types`]: tracking input, joint transforms and poses, arm handles
//! - [`traits::PoseSolver`]: the capability every arm model implements
//! - [`config`]: TOML-backed arm, transition and rig configuration
//! - [`error`]: typed errors for configuration and rig lookups
//! - [`time::FrameClock`]: per-update clock driving crossfades
//!
//! [`ArmatureCorePlugin`] registers the frame ordering shared by all
//! armature plugins.

pub mod config;
pub mod error;
pub mod time;
pub mod traits;
pub mod types;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// ArmatureSet
// ---------------------------------------------------------------------------

/// Ordering of the per-frame arm pipeline.
///
/// Configured as a chain in `Update`:
/// `Track -> Solve -> Blend -> Publish`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArmatureSet {
    /// Read tracking devices into [`types::TrackedFrame`].
    Track,
    /// Tick every registered arm model.
    Solve,
    /// Advance crossfades between arm models.
    Blend,
    /// Expose the composite pose to renderers.
    Publish,
}

// ---------------------------------------------------------------------------
// ArmatureCorePlugin
// ---------------------------------------------------------------------------

/// Registers [`ArmatureSet`] ordering, [`types::TrackedFrame`] and
/// [`time::FrameClock`].
pub struct ArmatureCorePlugin;

impl Plugin for ArmatureCorePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                ArmatureSet::Track,
                ArmatureSet::Solve,
                ArmatureSet::Blend,
                ArmatureSet::Publish,
            )
                .chain(),
        )
        .init_resource::<types::TrackedFrame>()
        .init_resource::<time::FrameClock>()
        .add_systems(
            Update,
            time::advance_frame_clock.before(ArmatureSet::Track),
        );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::config::{ArmConfig, ArmEntry, ModelTuning, RigConfig, TransitionConfig};
    pub use crate::error::{ArmatureError, ConfigError, RigError};
    pub use crate::time::FrameClock;
    pub use crate::traits::PoseSolver;
    pub use crate::types::{
        ArmId, FrameInput, Handedness, Joint, JointPose, JointTransform, TrackedFrame,
    };
    pub use crate::{ArmatureCorePlugin, ArmatureSet};
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
