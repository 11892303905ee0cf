//! Bevy systems moving tracking input into [`TrackedFrame`].

use bevy::prelude::*;

use armature_core::time::FrameClock;
use armature_core::types::TrackedFrame;

use crate::buffer::{ActiveTrackingSource, HandednessSwitch, TrackingBuffer};

/// Poll the active source, if one is installed, into the buffer.
#[allow(clippy::needless_pass_by_value)]
pub fn poll_tracking_source(
    clock: Res<FrameClock>,
    source: Option<ResMut<ActiveTrackingSource>>,
    mut buffer: ResMut<TrackingBuffer>,
) {
    let Some(mut source) = source else {
        return;
    };
    match source.0.sample(clock.elapsed()) {
        Some(sample) => buffer.push(sample),
        None => tracing::trace!(source = source.0.name(), "no fresh tracking sample"),
    }
}

/// Build this frame's solver input from the latest sample and the
/// handedness switch.
///
/// Leaves the tracked frame untouched until a sample has arrived.
#[allow(clippy::needless_pass_by_value)]
pub fn update_tracked_frame(
    buffer: Res<TrackingBuffer>,
    switch: Res<HandednessSwitch>,
    mut tracked: ResMut<TrackedFrame>,
) {
    if let Some(frame) = buffer.frame(switch.handedness()) {
        tracked.0 = frame;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::ArmatureSet;
    use armature_core::types::{FrameInput, Handedness};
    use nalgebra::Vector3;

    use crate::sample::TrackingSample;
    use crate::source::{ScriptedTracking, StaticTracking};

    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(armature_core::ArmatureCorePlugin);
        app.insert_resource(FrameClock::fixed(0.5));
        app.init_resource::<TrackingBuffer>();
        app.init_resource::<HandednessSwitch>();
        app.add_systems(
            Update,
            (poll_tracking_source, update_tracked_frame)
                .chain()
                .in_set(ArmatureSet::Track),
        );
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn no_sample_keeps_default_frame() {
        let mut app = build_test_app();
        app.update();
        assert_eq!(app.world().resource::<TrackedFrame>().0, FrameInput::default());
    }

    #[test]
    fn pushed_sample_reaches_tracked_frame() {
        let mut app = build_test_app();
        app.world_mut()
            .resource_mut::<TrackingBuffer>()
            .push(TrackingSample::default().with_head_position(Vector3::new(0.0, 1.8, 0.0)));
        app.world_mut().resource_mut::<HandednessSwitch>().is_left_handed = true;
        app.update();

        let frame = app.world().resource::<TrackedFrame>().0;
        assert!((frame.head_position.y - 1.8).abs() < f32::EPSILON);
        assert_eq!(frame.handedness, Handedness::Left);
    }

    #[test]
    fn active_source_is_polled_each_frame() {
        let mut app = build_test_app();
        let sample = TrackingSample::default().with_head_position(Vector3::new(0.0, 1.5, 0.0));
        app.insert_resource(ActiveTrackingSource::new(StaticTracking(sample)));
        app.update();
        app.update();

        assert_eq!(app.world().resource::<TrackingBuffer>().samples_received(), 2);
        let frame = app.world().resource::<TrackedFrame>().0;
        assert!((frame.head_position.y - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn scripted_source_uses_frame_clock() {
        let mut app = build_test_app();
        let script = ScriptedTracking::default();
        app.insert_resource(ActiveTrackingSource::new(script));
        app.update();
        app.update();

        // Two fixed 0.5 s frames: sampled at 1.0 s, the yaw peak.
        let frame = app.world().resource::<TrackedFrame>().0;
        let expected = script.yaw_at(1.0).to_radians();
        assert!((frame.gaze_direction.x - expected.sin()).abs() < 1e-4);
    }
}
