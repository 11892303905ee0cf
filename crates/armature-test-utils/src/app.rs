//! Bevy test app builders with various plugin combinations.

use bevy::prelude::*;

use armature_core::config::RigConfig;
use armature_core::time::FrameClock;

/// Fixed frame step used by test apps, in seconds.
pub const TEST_DT: f32 = 0.1;

/// Create a minimal test app with only the core plugin.
///
/// Provides `ArmatureSet` ordering, `TrackedFrame` and a fixed-step
/// `FrameClock`, but no solving or blending systems.
pub fn minimal_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(armature_core::ArmatureCorePlugin);
    app.insert_resource(FrameClock::fixed(TEST_DT));
    app.finish();
    app.cleanup();
    app
}

/// Create a full-stack test app: tracking, solving and blending with the
/// default point/throw rig installed.
pub fn full_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(armature_core::ArmatureCorePlugin);
    app.add_plugins(armature_tracking::ArmatureTrackingPlugin);
    app.add_plugins(armature_model::ArmModelPlugin);
    app.add_plugins(armature_transition::ArmTransitionPlugin);
    app.insert_resource(FrameClock::fixed(TEST_DT));
    armature_transition::install_rig(app.world_mut(), &RigConfig::default())
        .expect("default rig is valid");
    app.finish();
    app.cleanup();
    app
}

/// Run `n` frames (calls `app.update()` `n` times).
pub fn step_n(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
