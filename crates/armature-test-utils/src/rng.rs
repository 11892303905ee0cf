//! Deterministic RNG utilities for reproducible tests.

use std::f32::consts::PI;

use nalgebra::{UnitQuaternion, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use armature_core::types::{FrameInput, Handedness};

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniformly distributed rotation (Shoemake's method).
pub fn random_orientation(rng: &mut impl Rng) -> UnitQuaternion<f32> {
    let u1: f32 = rng.r#gen();
    let u2: f32 = rng.r#gen::<f32>() * 2.0 * PI;
    let u3: f32 = rng.r#gen::<f32>() * 2.0 * PI;
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(
        b * u3.cos(),
        a * u2.sin(),
        a * u2.cos(),
        b * u3.sin(),
    ))
}

/// Random but plausible tracking frame: any controller orientation, head
/// anywhere within a metre of standing height, gaze from a random head
/// orientation, modest angular velocity.
pub fn random_frame(rng: &mut impl Rng) -> FrameInput {
    let head = random_orientation(rng);
    let position = Vector3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(0.6..2.0),
        rng.gen_range(-1.0..1.0),
    );
    let omega = Vector3::new(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
    );
    let handedness = if rng.r#gen::<bool>() {
        Handedness::Left
    } else {
        Handedness::Right
    };
    FrameInput::from_head(position, &head, random_orientation(rng))
        .with_angular_velocity(omega)
        .with_handedness(handedness)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
