//! A registry of arms plus the controller blending between them.
//!
//! [`ArmRig`] is the engine-free entry point: build it from a
//! [`RigConfig`], call [`ArmRig::tick`] once per frame, and read the
//! blended pose.

use armature_core::config::RigConfig;
use armature_core::error::{ConfigError, RigError};
use armature_core::types::{ArmId, FrameInput, Joint, JointPose, JointTransform};
use armature_model::registry::ArmRegistry;

use crate::controller::{RequestOutcome, TransitionController};

#[derive(Debug, Default)]
pub struct ArmRig {
    registry: ArmRegistry,
    controller: TransitionController,
}

impl ArmRig {
    pub const fn new(registry: ArmRegistry, controller: TransitionController) -> Self {
        Self {
            registry,
            controller,
        }
    }

    /// One arm model per configured arm, starting on the initial arm.
    pub fn from_config(config: &RigConfig) -> Result<Self, ConfigError> {
        let registry = ArmRegistry::from_rig(config)?;
        let mut controller = TransitionController::new(config.transition.clone());
        let initial = config.initial_name().and_then(|name| registry.id(name));
        controller.request_transition(initial);
        Ok(Self::new(registry, controller))
    }

    /// Load a rig file and build it.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Self::from_config(&RigConfig::from_file(path)?)
    }

    pub const fn registry(&self) -> &ArmRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ArmRegistry {
        &mut self.registry
    }

    pub const fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TransitionController {
        &mut self.controller
    }

    /// Split into the ECS resources.
    pub fn into_parts(self) -> (ArmRegistry, TransitionController) {
        (self.registry, self.controller)
    }

    /// Solve every arm, advance crossfades by `dt`, and return the blended
    /// pose.
    pub fn tick(&mut self, dt: f32, frame: &FrameInput) -> JointPose {
        self.registry.tick_all(frame);
        self.controller.tick(dt);
        self.controller.pose(&self.registry)
    }

    /// Blend towards the arm registered as `name`.
    ///
    /// Unknown names are ignored.
    pub fn request(&mut self, name: &str) -> RequestOutcome {
        let target = self.registry.id(name);
        if target.is_none() {
            tracing::warn!(name, "transition to unknown arm ignored");
        }
        self.controller.request_transition(target)
    }

    /// Like [`request`](Self::request), but reports an unknown name.
    pub fn try_request(&mut self, name: &str) -> Result<RequestOutcome, RigError> {
        let target = self.registry.require(name)?;
        Ok(self.controller.request_transition(Some(target)))
    }

    /// Blend towards a registered arm by handle. Unregistered ids are ignored.
    pub fn request_id(&mut self, id: ArmId) -> RequestOutcome {
        let target = self.registry.contains(id).then_some(id);
        self.controller.request_transition(target)
    }

    pub fn current(&self) -> Option<ArmId> {
        self.controller.current()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current().and_then(|id| self.registry.name(id))
    }

    pub fn pose(&self) -> JointPose {
        self.controller.pose(&self.registry)
    }

    pub fn joint(&self, joint: Joint) -> JointTransform {
        self.controller.joint(&self.registry, joint)
    }

    pub fn controller_from_head(&self) -> JointTransform {
        self.controller.controller_from_head(&self.registry)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
