//! Tracking input for the armature arm pipeline.
//!
//! This crate keeps device capture separate from solving:
//!
//! - [`TrackingSample`]: one head and controller reading
//! - [`TrackingSource`]: anything producing samples over time
//!   ([`StaticTracking`], [`ScriptedTracking`] or a device integration)
//! - [`TrackingBuffer`]: resource holding the latest sample
//! - [`HandednessSwitch`]: resource holding the user's hand preference
//! - [`ArmatureTrackingPlugin`]: polls the active source and builds
//!   [`TrackedFrame`](armature_core::types::TrackedFrame) each frame
//!
//! # Example
//!
//! ```no_run
//! use bevy::prelude::*;
//! use armature_tracking::prelude::*;
//!
//! App::new()
//!     .add_plugins(armature_core::ArmatureCorePlugin)
//!     .add_plugins(ArmatureTrackingPlugin)
//!     .insert_resource(ActiveTrackingSource::new(ScriptedTracking::default()))
//!     .run();
//! ```

pub mod buffer;
pub mod sample;
pub mod source;
pub mod systems;

use bevy::prelude::*;
use armature_core::ArmatureSet;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use buffer::{ActiveTrackingSource, HandednessSwitch, TrackingBuffer};
pub use sample::TrackingSample;
pub use source::{ScriptedTracking, StaticTracking, TrackingSource};

// ---------------------------------------------------------------------------
// ArmatureTrackingPlugin
// ---------------------------------------------------------------------------

/// Bevy plugin turning tracking input into solver input.
///
/// Runs in [`ArmatureSet::Track`]: the active source (if any) is polled
/// into [`TrackingBuffer`], then the latest sample and
/// [`HandednessSwitch`] are written to
/// [`TrackedFrame`](armature_core::types::TrackedFrame).
pub struct ArmatureTrackingPlugin;

impl Plugin for ArmatureTrackingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackingBuffer>()
            .init_resource::<HandednessSwitch>()
            .add_systems(
                Update,
                (systems::poll_tracking_source, systems::update_tracked_frame)
                    .chain()
                    .in_set(ArmatureSet::Track),
            );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActiveTrackingSource, ArmatureTrackingPlugin, HandednessSwitch, ScriptedTracking,
        StaticTracking, TrackingBuffer, TrackingSample, TrackingSource,
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::types::{Handedness, TrackedFrame};
    use nalgebra::Vector3;

    #[test]
    fn plugin_builds_without_panic() {
        let mut app = App::new();
        app.add_plugins(armature_core::ArmatureCorePlugin);
        app.add_plugins(ArmatureTrackingPlugin);
        app.finish();
        app.cleanup();
        app.update();

        assert!(app.world().get_resource::<TrackingBuffer>().is_some());
        assert!(app.world().get_resource::<HandednessSwitch>().is_some());
    }

    #[test]
    fn left_handed_switch_flows_into_frame() {
        let mut app = App::new();
        app.add_plugins(armature_core::ArmatureCorePlugin);
        app.add_plugins(ArmatureTrackingPlugin);
        app.insert_resource(HandednessSwitch::left());
        app.insert_resource(ActiveTrackingSource::new(StaticTracking(
            TrackingSample::default().with_head_position(Vector3::new(0.1, 1.7, 0.0)),
        )));
        app.finish();
        app.cleanup();
        app.update();

        let frame = app.world().resource::<TrackedFrame>().0;
        assert_eq!(frame.handedness, Handedness::Left);
        assert!((frame.head_position.x - 0.1).abs() < f32::EPSILON);
    }
}
