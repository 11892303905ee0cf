//! Shared test fixtures and utilities for armature crates.
//!
//! Provides reusable helpers for building Bevy test apps, canned tracking
//! frames, stub solvers and deterministic RNG setup.

pub mod app;
pub mod fixtures;
pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::{TEST_DT, full_test_app, minimal_test_app, step_n};
pub use fixtures::{neutral_frame, pitched_frame, turned_frame};
pub use mocks::FixedPoseSolver;
pub use rng::{random_frame, random_orientation, seeded_rng};
