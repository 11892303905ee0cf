//! Integration tests for a point/throw session.
//!
//! Runs the full plugin pipeline headless and verifies:
//! - Toggling the throwing flag crossfades to the other posture and settles
//! - Mid-crossfade poses are the blend of the two solved arms
//! - Rapid toggling never overflows the crossfade queue
//! - Solved bone lengths stay rigid for arbitrary tracking input

use approx::assert_relative_eq;
use bevy::prelude::*;

use armature_core::prelude::*;
use armature_demos::{IsThrowing, PostureTogglePlugin};
use armature_model::{ArmModel, ArmRegistry};
use armature_test_utils::{
    TEST_DT, full_test_app, pitched_frame, random_frame, seeded_rng, step_n,
};
use armature_transition::blend::blend_transform;
use armature_transition::{BlendedArmPose, TransitionController};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn session_app() -> App {
    let mut app = full_test_app();
    app.add_plugins(PostureTogglePlugin);
    app.world_mut().resource_mut::<TrackedFrame>().0 = pitched_frame(30.0, Handedness::Right);
    app
}

fn arm_id(app: &App, name: &str) -> ArmId {
    app.world()
        .resource::<ArmRegistry>()
        .id(name)
        .unwrap_or_else(|| panic!("missing arm {name}"))
}

fn set_throwing(app: &mut App, throwing: bool) {
    app.world_mut().resource_mut::<IsThrowing>().0 = throwing;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn toggle_settles_on_throw_then_point() {
    let mut app = session_app();
    let point = arm_id(&app, "point");
    let throw = arm_id(&app, "throw");

    step_n(&mut app, 3);
    assert_eq!(app.world().resource::<BlendedArmPose>().current, Some(point));

    set_throwing(&mut app, true);
    step_n(&mut app, 10);
    let blended = *app.world().resource::<BlendedArmPose>();
    assert_eq!(blended.current, Some(throw));
    assert!(!blended.transitioning);

    let solved = *app.world().resource::<ArmRegistry>().pose(throw).unwrap();
    assert_eq!(blended.pose, solved);

    set_throwing(&mut app, false);
    step_n(&mut app, 10);
    assert_eq!(app.world().resource::<BlendedArmPose>().current, Some(point));
}

#[test]
fn mid_crossfade_blends_both_arms() {
    let mut app = session_app();
    let point = arm_id(&app, "point");
    let throw = arm_id(&app, "throw");
    step_n(&mut app, 2);

    set_throwing(&mut app, true);
    app.update();

    let progress = app.world().resource::<TransitionController>().entries()[0].progress();
    // One fixed step at speed 5.
    assert_relative_eq!(progress, 5.0 * TEST_DT, epsilon = 1e-6);

    let registry = app.world().resource::<ArmRegistry>();
    let from = registry.pose(point).unwrap().controller;
    let to = registry.pose(throw).unwrap().controller;
    let expected = blend_transform(&from, &to, progress);

    let blended = app.world().resource::<BlendedArmPose>();
    assert!(blended.transitioning);
    assert_relative_eq!(blended.pose.controller.position, expected.position, epsilon = 1e-5);
    assert!(
        (blended.pose.controller.position - from.position).norm()
            < (to.position - from.position).norm()
    );
}

#[test]
fn rapid_toggling_respects_capacity() {
    let mut app = session_app();
    let capacity = app
        .world()
        .resource::<TransitionController>()
        .config()
        .max_active;

    for frame in 0..60 {
        set_throwing(&mut app, frame % 2 == 0);
        app.update();
        let controller = app.world().resource::<TransitionController>();
        assert!(controller.entries().len() <= capacity);
        assert!(app.world().resource::<BlendedArmPose>().pose.is_finite());
    }
}

#[test]
fn bones_stay_rigid_under_random_tracking() {
    let mut rng = seeded_rng(2024);
    for config in [ArmConfig::pointing(), ArmConfig::throwing()] {
        let forearm = config.wrist_rest().norm();
        let shoulder = config.tuning.shoulder_rest().norm();
        let mut model = ArmModel::new(config);

        for _ in 0..200 {
            let frame = random_frame(&mut rng);
            let pose = model.tick(&frame);
            assert!(pose.is_finite());
            assert_relative_eq!(
                (pose.wrist.position - pose.elbow.position).norm(),
                forearm,
                epsilon = 1e-4
            );
            assert_relative_eq!(
                (pose.shoulder.position - model.neck_position()).norm(),
                shoulder,
                epsilon = 1e-4
            );
        }
    }
}
