//! Drives an `ArmRig` directly, without Bevy, and prints limb segments.
//!
//! Shows the engine-free API: tick with an explicit `dt`, request postures by
//! name, and lay out bicep/forearm segments for a renderer.
//!
//! Run: `cargo run -p armature-demos --bin rig_without_engine`

use armature_core::types::Handedness;
use armature_demos::point_throw_rig;
use armature_model::{LimbConfig, LimbLayout};
use armature_tracking::{ScriptedTracking, TrackingSource};
use armature_transition::ArmRig;

const DT: f32 = 1.0 / 72.0;

fn main() {
    println!("=== Engine-free Rig Demo ===\n");

    let rig_config = point_throw_rig().expect("bundled rig is valid");
    let mut rig = ArmRig::from_config(&rig_config).expect("failed to build rig");
    let mut tracking = ScriptedTracking::default();
    let limbs = LimbConfig::default();

    for frame in 0u32..216 {
        if frame == 72 {
            rig.request("throw");
        }
        if frame == 144 {
            rig.request("point");
        }

        let elapsed = f64::from(frame) * f64::from(DT);
        let Some(sample) = tracking.sample(elapsed) else {
            continue;
        };
        let pose = rig.tick(DT, &sample.to_frame(Handedness::Right));

        if frame % 24 == 0 {
            let layout = LimbLayout::from_pose(&pose, &limbs);
            println!(
                "frame {frame:>3}  {:<5}  bicep len={:.3} stretch={:.3}  forearm len={:.3} stretch={:.3}",
                rig.current_name().unwrap_or("-"),
                layout.bicep.length,
                layout.bicep.stretch,
                layout.forearm.length,
                layout.forearm.stretch,
            );
        }
    }
}
