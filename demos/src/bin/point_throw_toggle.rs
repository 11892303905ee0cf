//! Point/throw toggle running through the full plugin pipeline.
//!
//! Scripted tracking drives the rig while the throwing flag flips every
//! second; each flip crossfades to the other posture.
//!
//! Run: `cargo run -p armature-demos --bin point_throw_toggle`

use bevy::prelude::*;

use armature_core::prelude::*;
use armature_demos::{IsThrowing, PostureTogglePlugin, point_throw_rig};
use armature_model::{ArmModelPlugin, ArmRegistry};
use armature_tracking::prelude::*;
use armature_transition::{ArmTransitionPlugin, BlendedArmPose, install_rig};

const DT: f32 = 1.0 / 60.0;
const FRAMES: u32 = 300;
const FLIP_EVERY: u32 = 60;

fn main() {
    tracing_subscriber::fmt::init();
    println!("=== Point/Throw Toggle Demo ===\n");

    // ---------------------------------------------------------------
    // 1. Build the pipeline
    // ---------------------------------------------------------------
    let mut app = App::new();
    app.add_plugins(ArmatureCorePlugin)
        .add_plugins(ArmatureTrackingPlugin)
        .add_plugins(ArmModelPlugin)
        .add_plugins(ArmTransitionPlugin)
        .add_plugins(PostureTogglePlugin)
        .insert_resource(FrameClock::fixed(DT))
        .insert_resource(ActiveTrackingSource::new(ScriptedTracking::default()));

    let rig = point_throw_rig().expect("bundled rig is valid");
    install_rig(app.world_mut(), &rig).expect("failed to install rig");
    app.finish();
    app.cleanup();

    // ---------------------------------------------------------------
    // 2. Run, flipping the throwing flag periodically
    // ---------------------------------------------------------------
    for frame in 1..=FRAMES {
        if frame % FLIP_EVERY == 0 {
            let mut flag = app.world_mut().resource_mut::<IsThrowing>();
            flag.0 = !flag.0;
            println!("-- frame {frame}: throwing = {}", flag.0);
        }

        app.update();

        if frame % 15 == 0 {
            let registry = app.world().resource::<ArmRegistry>();
            let blended = app.world().resource::<BlendedArmPose>();
            let name = blended
                .current
                .and_then(|id| registry.name(id))
                .unwrap_or("-");
            let c = blended.pose.controller.position;
            println!(
                "frame {frame:>3}  current={name:<6} blending={:<5} controller=({:+.3}, {:+.3}, {:+.3})",
                blended.transitioning, c.x, c.y, c.z
            );
        }
    }
}
