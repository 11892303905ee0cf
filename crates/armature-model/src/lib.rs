//! Analytic arm model for tracked VR controllers.
//!
//! Reconstructs shoulder, elbow, wrist and controller transforms from a head
//! pose and a controller orientation, with no elbow or wrist sensors.
//!
//! # Architecture
//!
//! ```text
//! FrameInput ──► TorsoFilter ──► ExtensionCurve ──► RotationSplit
//!                                                       │
//!                   JointPose ◄── ChainLayout ◄── JointRotationRule
//! ```
//!
//! [`ArmModel`] composes the default strategies from an
//! [`ArmConfig`](armature_core::config::ArmConfig); each step can be
//! replaced through the builder methods. Models are stored by handle in an
//! [`ArmRegistry`] so crossfades can address them without owning them.

pub mod limb;
pub mod math;
pub mod plugin;
pub mod registry;
pub mod solver;
pub mod strategy;
pub mod torso;

pub use limb::{LimbConfig, LimbLayout, LimbSegment};
pub use plugin::ArmModelPlugin;
pub use registry::ArmRegistry;
pub use solver::{ArmModel, SolveTrace};
pub use strategy::{
    ChainLayout, ExtensionCurve, JointRotationRule, LinearExtension, NeckPivotChain,
    RotationSplit, ShoulderPivotChain, SplitRotations, SuppressedSplit,
};
pub use torso::{TorsoFilter, TorsoState};
