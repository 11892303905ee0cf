//! Crossfading between arm models.
//!
//! [`TransitionController`] owns no solvers. It tracks which arm is
//! current and a queue of crossfades towards other arms, all by
//! [`ArmId`]; poses are read from an [`ArmRegistry`] when composing.

use bevy::prelude::Resource;
use nalgebra::{UnitQuaternion, Vector3};

use armature_core::config::TransitionConfig;
use armature_core::types::{ArmId, Joint, JointPose, JointTransform};
use armature_model::registry::ArmRegistry;

use crate::blend::{compose, compose_joint};
use crate::queue::{TransitionEntry, TransitionPhase, TransitionQueue};

// ---------------------------------------------------------------------------
// RequestOutcome
// ---------------------------------------------------------------------------

/// What a call to [`TransitionController::request_transition`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// No target was given; nothing changed.
    Ignored,
    /// There was no current arm, so the target became current immediately.
    Bootstrapped,
    /// A crossfade was appended to the queue.
    Queued {
        /// Barely-started entries discarded first.
        dropped: usize,
        /// Oldest entry evicted to make room.
        evicted: Option<ArmId>,
    },
}

// ---------------------------------------------------------------------------
// TransitionController
// ---------------------------------------------------------------------------

/// Current arm plus queued crossfades, composed into one pose.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TransitionController {
    config: TransitionConfig,
    current: Option<ArmId>,
    queue: TransitionQueue,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new(TransitionConfig::default())
    }
}

impl TransitionController {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            queue: TransitionQueue::new(config.max_active),
            current: None,
            config,
        }
    }

    /// Controller that starts on `current` without blending.
    pub fn with_current(config: TransitionConfig, current: ArmId) -> Self {
        let mut controller = Self::new(config);
        controller.current = Some(current);
        controller
    }

    pub const fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub const fn current(&self) -> Option<ArmId> {
        self.current
    }

    /// Queued crossfades, oldest first.
    pub fn entries(&self) -> &[TransitionEntry] {
        self.queue.entries()
    }

    pub fn is_transitioning(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Phase of the newest queued crossfade towards `id`, if any.
    pub fn phase_of(&self, id: ArmId) -> Option<TransitionPhase> {
        self.queue
            .iter()
            .rev()
            .find(|e| e.target() == id)
            .map(|e| e.phase(self.config.drop_threshold))
    }

    /// Start a crossfade towards `target`.
    ///
    /// A missing target is ignored. With no current arm the target becomes
    /// current at once. Otherwise barely-started crossfades are dropped,
    /// the oldest is evicted if the queue is full, and the target is
    /// appended at zero progress.
    pub fn request_transition(&mut self, target: Option<ArmId>) -> RequestOutcome {
        let Some(target) = target else {
            tracing::debug!("transition request without target ignored");
            return RequestOutcome::Ignored;
        };

        if self.current.is_none() {
            tracing::info!(%target, "initial arm set");
            self.current = Some(target);
            return RequestOutcome::Bootstrapped;
        }

        let dropped = self.queue.drop_below(self.config.drop_threshold);
        if dropped > 0 {
            tracing::debug!(dropped, "dropped barely-started transitions");
        }
        let evicted = self.queue.push(TransitionEntry::new(target)).map(|e| e.target());
        if let Some(evicted) = evicted {
            tracing::debug!(%evicted, "evicted oldest transition");
        }
        tracing::debug!(%target, queued = self.queue.len(), "transition requested");

        RequestOutcome::Queued { dropped, evicted }
    }

    /// Advance every crossfade by `dt` seconds.
    ///
    /// Entries are eased newest to oldest; the first to complete becomes
    /// current and is removed together with every older entry. At most one
    /// promotion happens per tick. Returns the promoted arm.
    pub fn tick(&mut self, dt: f32) -> Option<ArmId> {
        if self.queue.is_empty() {
            return None;
        }

        let step = (dt * self.config.speed).clamp(0.0, 1.0);
        let index = self.queue.advance(step, self.config.completion_snap)?;
        let target = self.queue.entries()[index].target();
        self.queue.remove_through(index);
        self.current = Some(target);
        tracing::info!(%target, remaining = self.queue.len(), "transition complete");
        Some(target)
    }

    /// Drop every crossfade and forget the current arm.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.current = None;
    }

    // -- Composition --------------------------------------------------------

    /// Composite pose: the current arm pulled towards each queued target,
    /// oldest first.
    ///
    /// With no current arm every joint is at the origin with no rotation.
    /// Targets missing from the registry are skipped.
    pub fn pose(&self, registry: &ArmRegistry) -> JointPose {
        let Some(base) = self.current.and_then(|id| registry.pose(id)) else {
            return JointPose::default();
        };
        compose(
            base,
            self.queue
                .iter()
                .filter_map(|e| registry.pose(e.target()).map(|p| (p, e.progress()))),
        )
    }

    /// One joint of [`pose`](Self::pose).
    pub fn joint(&self, registry: &ArmRegistry, joint: Joint) -> JointTransform {
        let Some(base) = self.current.and_then(|id| registry.pose(id)) else {
            return JointTransform::identity();
        };
        compose_joint(
            base.joint(joint),
            self.queue.iter().filter_map(|e| {
                registry
                    .pose(e.target())
                    .map(|p| (p.joint(joint), e.progress()))
            }),
        )
    }

    pub fn position(&self, registry: &ArmRegistry, joint: Joint) -> Vector3<f32> {
        self.joint(registry, joint).position
    }

    pub fn rotation(&self, registry: &ArmRegistry, joint: Joint) -> UnitQuaternion<f32> {
        self.joint(registry, joint).rotation
    }

    /// Blended controller transform relative to the head.
    pub fn controller_from_head(&self, registry: &ArmRegistry) -> JointTransform {
        self.joint(registry, Joint::Controller)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
