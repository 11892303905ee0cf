//! Handle-addressed storage for pose solvers.
//!
//! Crossfades refer to arms by [`ArmId`] instead of owning them, so one
//! solver may be the current arm, a queued target, or idle without being
//! copied.

use std::collections::HashMap;

use bevy::prelude::*;

use armature_core::config::RigConfig;
use armature_core::error::{ConfigError, RigError};
use armature_core::traits::PoseSolver;
use armature_core::types::{ArmId, FrameInput, JointPose};

use crate::solver::ArmModel;

/// A solver plus the name it was registered under.
pub struct RegisteredArm {
    pub name: String,
    pub solver: Box<dyn PoseSolver>,
}

/// Resource mapping [`ArmId`] to registered solvers.
///
/// Ids are handed out in insertion order starting from zero and are never
/// reused.
#[derive(Resource, Default)]
pub struct ArmRegistry {
    arms: HashMap<ArmId, RegisteredArm>,
    names: HashMap<String, ArmId>,
    next_id: u32,
}

impl std::fmt::Debug for ArmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for id in self.ids() {
            map.entry(&id, &self.arms[&id].name);
        }
        map.finish()
    }
}

impl ArmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one [`ArmModel`] per arm of a validated rig, in file order.
    pub fn from_rig(rig: &RigConfig) -> Result<Self, ConfigError> {
        rig.validate()?;
        let mut registry = Self::new();
        for entry in &rig.arms {
            let model = ArmModel::new(entry.model.clone()).with_name(entry.name.clone());
            registry
                .insert(entry.name.clone(), model)
                .map_err(|_| ConfigError::DuplicateArm(entry.name.clone()))?;
        }
        Ok(registry)
    }

    /// Register a solver under a unique name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        solver: impl PoseSolver,
    ) -> Result<ArmId, RigError> {
        self.insert_boxed(name, Box::new(solver))
    }

    pub fn insert_boxed(
        &mut self,
        name: impl Into<String>,
        solver: Box<dyn PoseSolver>,
    ) -> Result<ArmId, RigError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(RigError::DuplicateName(name));
        }
        let id = ArmId(self.next_id);
        self.next_id += 1;
        tracing::debug!(%id, %name, solver = solver.name(), "registered arm");
        self.names.insert(name.clone(), id);
        self.arms.insert(id, RegisteredArm { name, solver });
        Ok(id)
    }

    /// Remove an arm, returning its solver.
    pub fn remove(&mut self, id: ArmId) -> Option<Box<dyn PoseSolver>> {
        let arm = self.arms.remove(&id)?;
        self.names.remove(&arm.name);
        Some(arm.solver)
    }

    pub fn id(&self, name: &str) -> Option<ArmId> {
        self.names.get(name).copied()
    }

    /// Like [`id`](Self::id) but reports the missing name.
    pub fn require(&self, name: &str) -> Result<ArmId, RigError> {
        self.id(name)
            .ok_or_else(|| RigError::UnknownName(name.to_owned()))
    }

    pub fn name(&self, id: ArmId) -> Option<&str> {
        self.arms.get(&id).map(|a| a.name.as_str())
    }

    pub fn contains(&self, id: ArmId) -> bool {
        self.arms.contains_key(&id)
    }

    pub fn get(&self, id: ArmId) -> Option<&dyn PoseSolver> {
        self.arms.get(&id).map(|a| a.solver.as_ref())
    }

    pub fn get_mut(&mut self, id: ArmId) -> Option<&mut (dyn PoseSolver + 'static)> {
        self.arms.get_mut(&id).map(|a| a.solver.as_mut())
    }

    /// Latest pose of an arm.
    pub fn pose(&self, id: ArmId) -> Option<&JointPose> {
        self.get(id).map(|solver| solver.pose())
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<ArmId> {
        let mut ids: Vec<ArmId> = self.arms.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    /// Tick every registered solver with the same frame.
    ///
    /// Idle arms are ticked too so their torso filters stay warm for when a
    /// crossfade picks them up.
    pub fn tick_all(&mut self, input: &FrameInput) {
        for arm in self.arms.values_mut() {
            arm.solver.tick(input);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::config::ArmConfig;
    use nalgebra::Vector3;

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut registry = ArmRegistry::new();
        let a = registry.insert("point", ArmModel::default()).unwrap();
        let b = registry.insert("throw", ArmModel::new(ArmConfig::throwing())).unwrap();
        assert_eq!(a, ArmId(0));
        assert_eq!(b, ArmId(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec![a, b]);
        assert_eq!(registry.name(b), Some("throw"));
        assert_eq!(registry.id("point"), Some(a));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut registry = ArmRegistry::new();
        registry.insert("point", ArmModel::default()).unwrap();
        let err = registry.insert("point", ArmModel::default()).unwrap_err();
        assert_eq!(err, RigError::DuplicateName("point".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn require_reports_missing_name() {
        let registry = ArmRegistry::new();
        assert_eq!(
            registry.require("swing"),
            Err(RigError::UnknownName("swing".into()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_frees_name_but_not_id() {
        let mut registry = ArmRegistry::new();
        let a = registry.insert("point", ArmModel::default()).unwrap();
        assert!(registry.remove(a).is_some());
        assert!(!registry.contains(a));
        assert!(registry.remove(a).is_none());
        let b = registry.insert("point", ArmModel::default()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tick_all_updates_every_pose() {
        let mut registry = ArmRegistry::from_rig(&RigConfig::default()).unwrap();
        let frame = FrameInput::default().with_head_position(Vector3::new(0.0, 1.5, 0.0));
        registry.tick_all(&frame);
        for id in registry.ids() {
            let pose = registry.pose(id).unwrap();
            assert!((pose.shoulder.position.y - 1.3).abs() < 1e-6);
        }
    }

    #[test]
    fn from_rig_names_solvers() {
        let registry = ArmRegistry::from_rig(&RigConfig::default()).unwrap();
        let throw = registry.id("throw").unwrap();
        assert_eq!(registry.get(throw).unwrap().name(), "throw");
        assert_eq!(format!("{registry:?}"), r#"{ArmId(0): "point", ArmId(1): "throw"}"#);
    }

    #[test]
    fn from_rig_rejects_invalid_rig() {
        let rig = RigConfig {
            arms: Vec::new(),
            ..RigConfig::default()
        };
        assert!(matches!(ArmRegistry::from_rig(&rig), Err(ConfigError::EmptyRig)));
    }
}
