use std::collections::HashSet;

use bevy::prelude::Resource;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_elbow_rest() -> [f32; 3] {
    [0.195, -0.5, 0.005]
}
const fn default_wrist_rest() -> [f32; 3] {
    [0.0, 0.0, 0.25]
}
const fn default_controller_rest() -> [f32; 3] {
    [0.0, 0.0, 0.05]
}
const fn default_extension_offset() -> [f32; 3] {
    [-0.13, 0.14, 0.08]
}
const fn default_elbow_bend_ratio() -> f32 {
    0.6
}
const fn default_shoulder_rest() -> [f32; 3] {
    [0.17, -0.2, -0.03]
}
const fn default_min_extension_angle() -> f32 {
    7.0
}
const fn default_max_extension_angle() -> f32 {
    60.0
}
const fn default_extension_weight() -> f32 {
    0.4
}
const fn default_torso_velocity_floor() -> f32 {
    0.2
}
const fn default_torso_velocity_divisor() -> f32 {
    45.0
}
const fn default_torso_max_strength() -> f32 {
    0.1
}
const fn default_transition_speed() -> f32 {
    5.0
}
const fn default_max_active_transitions() -> usize {
    10
}
const fn default_drop_threshold() -> f32 {
    0.035
}
const fn default_completion_snap() -> f32 {
    0.95
}

fn to_vec(v: [f32; 3]) -> Vector3<f32> {
    Vector3::new(v[0], v[1], v[2])
}

fn check_finite(name: &'static str, v: [f32; 3]) -> Result<(), ConfigError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteVector(name))
    }
}

fn check_unit_interval(field: &str, value: f32, inclusive_max: bool) -> Result<(), ConfigError> {
    let in_range = if inclusive_max {
        (0.0..=1.0).contains(&value)
    } else {
        (0.0..1.0).contains(&value)
    };
    if in_range {
        Ok(())
    } else {
        let upper = if inclusive_max { "1]" } else { "1)" };
        Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("{value} must be within [0, {upper}"),
        })
    }
}

// ---------------------------------------------------------------------------
// ModelTuning
// ---------------------------------------------------------------------------

/// Derived constants of the arm model.
///
/// These rarely change between postures; they are exposed so that variant
/// models can retune the extension curve or the torso filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTuning {
    /// Reference shoulder offset from the neck, before handedness mirroring.
    #[serde(default = "default_shoulder_rest")]
    pub shoulder_rest: [f32; 3],

    /// Controller pitch (degrees) at which the elbow starts extending.
    #[serde(default = "default_min_extension_angle")]
    pub min_extension_angle: f32,

    /// Controller pitch (degrees) at which the elbow is fully extended.
    #[serde(default = "default_max_extension_angle")]
    pub max_extension_angle: f32,

    /// Increases elbow bending as the controller moves up (unitless).
    #[serde(default = "default_extension_weight")]
    pub extension_weight: f32,

    /// Head angular speed below which the torso does not follow the gaze.
    #[serde(default = "default_torso_velocity_floor")]
    pub torso_velocity_floor: f32,

    /// Divisor mapping excess angular speed to filter strength.
    #[serde(default = "default_torso_velocity_divisor")]
    pub torso_velocity_divisor: f32,

    /// Upper bound of the per-tick torso filter strength.
    #[serde(default = "default_torso_max_strength")]
    pub torso_max_strength: f32,
}

impl Default for ModelTuning {
    fn default() -> Self {
        Self {
            shoulder_rest: default_shoulder_rest(),
            min_extension_angle: default_min_extension_angle(),
            max_extension_angle: default_max_extension_angle(),
            extension_weight: default_extension_weight(),
            torso_velocity_floor: default_torso_velocity_floor(),
            torso_velocity_divisor: default_torso_velocity_divisor(),
            torso_max_strength: default_torso_max_strength(),
        }
    }
}

impl ModelTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("shoulder_rest", self.shoulder_rest)?;
        if !(self.min_extension_angle < self.max_extension_angle) {
            return Err(ConfigError::InvalidExtensionRange {
                min: self.min_extension_angle,
                max: self.max_extension_angle,
            });
        }
        if !(self.torso_velocity_divisor > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "torso_velocity_divisor".into(),
                message: "must be > 0".into(),
            });
        }
        check_unit_interval("extension_weight", self.extension_weight, true)?;
        check_unit_interval("torso_max_strength", self.torso_max_strength, true)
    }

    pub fn shoulder_rest(&self) -> Vector3<f32> {
        to_vec(self.shoulder_rest)
    }
}

// ---------------------------------------------------------------------------
// ArmConfig
// ---------------------------------------------------------------------------

/// Static tuning data for one arm posture.
///
/// All rest vectors are expressed for a right hand and mirrored at solve
/// time for left-handed users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmConfig {
    /// Elbow offset from the neck before the model is applied.
    #[serde(default = "default_elbow_rest")]
    pub elbow_rest: [f32; 3],

    /// Wrist offset from the elbow before the model is applied.
    #[serde(default = "default_wrist_rest")]
    pub wrist_rest: [f32; 3],

    /// Controller offset from the wrist before the model is applied.
    #[serde(default = "default_controller_rest")]
    pub controller_rest: [f32; 3],

    /// Offset added to the elbow as the controller is raised.
    #[serde(default = "default_extension_offset")]
    pub extension_offset: [f32; 3],

    /// Share of the controller rotation applied to the elbow; the remainder
    /// goes to the wrist.
    #[serde(default = "default_elbow_bend_ratio")]
    pub elbow_bend_ratio: f32,

    /// Pivot the elbow around the shoulder and hold the wrist rigid.
    #[serde(default)]
    pub shoulder_pivot: bool,

    /// Pivot point offset from the neck, used in shoulder-pivot mode.
    #[serde(default)]
    pub pivot_offset: [f32; 3],

    #[serde(default)]
    pub tuning: ModelTuning,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            elbow_rest: default_elbow_rest(),
            wrist_rest: default_wrist_rest(),
            controller_rest: default_controller_rest(),
            extension_offset: default_extension_offset(),
            elbow_bend_ratio: default_elbow_bend_ratio(),
            shoulder_pivot: false,
            pivot_offset: [0.0; 3],
            tuning: ModelTuning::default(),
        }
    }
}

impl ArmConfig {
    /// Neck-pivot posture for pointing.
    pub fn pointing() -> Self {
        Self::default()
    }

    /// Shoulder-pivot posture with a rigid wrist, for throwing.
    pub fn throwing() -> Self {
        Self {
            shoulder_pivot: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_elbow_bend_ratio(mut self, ratio: f32) -> Self {
        self.elbow_bend_ratio = ratio;
        self
    }

    #[must_use]
    pub const fn with_shoulder_pivot(mut self, shoulder_pivot: bool) -> Self {
        self.shoulder_pivot = shoulder_pivot;
        self
    }

    #[must_use]
    pub const fn with_elbow_rest(mut self, elbow_rest: [f32; 3]) -> Self {
        self.elbow_rest = elbow_rest;
        self
    }

    #[must_use]
    pub const fn with_extension_offset(mut self, offset: [f32; 3]) -> Self {
        self.extension_offset = offset;
        self
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("elbow_rest", self.elbow_rest)?;
        check_finite("wrist_rest", self.wrist_rest)?;
        check_finite("controller_rest", self.controller_rest)?;
        check_finite("extension_offset", self.extension_offset)?;
        check_finite("pivot_offset", self.pivot_offset)?;
        if !(0.0..=1.0).contains(&self.elbow_bend_ratio) {
            return Err(ConfigError::InvalidBendRatio(self.elbow_bend_ratio));
        }
        self.tuning.validate()
    }

    pub fn elbow_rest(&self) -> Vector3<f32> {
        to_vec(self.elbow_rest)
    }

    pub fn wrist_rest(&self) -> Vector3<f32> {
        to_vec(self.wrist_rest)
    }

    pub fn controller_rest(&self) -> Vector3<f32> {
        to_vec(self.controller_rest)
    }

    pub fn extension_offset(&self) -> Vector3<f32> {
        to_vec(self.extension_offset)
    }

    pub fn pivot_offset(&self) -> Vector3<f32> {
        to_vec(self.pivot_offset)
    }
}

// ---------------------------------------------------------------------------
// TransitionConfig
// ---------------------------------------------------------------------------

/// Tuning of the crossfade queue between arm models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Exponential ease rate (per second).
    #[serde(default = "default_transition_speed")]
    pub speed: f32,

    /// Maximum number of crossfades in flight at once.
    #[serde(default = "default_max_active_transitions")]
    pub max_active: usize,

    /// Progress below which a crossfade is dropped when a new one is requested.
    #[serde(default = "default_drop_threshold")]
    pub drop_threshold: f32,

    /// Progress at which a crossfade snaps to completion.
    #[serde(default = "default_completion_snap")]
    pub completion_snap: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            speed: default_transition_speed(),
            max_active: default_max_active_transitions(),
            drop_threshold: default_drop_threshold(),
            completion_snap: default_completion_snap(),
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub const fn with_max_active(mut self, max_active: usize) -> Self {
        self.max_active = max_active;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            return Err(ConfigError::InvalidTransitionSpeed(self.speed));
        }
        if self.max_active == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        check_unit_interval("drop_threshold", self.drop_threshold, false)?;
        check_unit_interval("completion_snap", self.completion_snap, true)
    }
}

// ---------------------------------------------------------------------------
// RigConfig
// ---------------------------------------------------------------------------

/// A named arm posture inside a rig file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmEntry {
    pub name: String,
    #[serde(default)]
    pub model: ArmConfig,
}

impl ArmEntry {
    pub fn new(name: impl Into<String>, model: ArmConfig) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }
}

/// Complete rig description: the postures and how to crossfade between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct RigConfig {
    /// Name of the posture active before any transition is requested.
    /// Defaults to the first arm.
    #[serde(default)]
    pub initial: Option<String>,

    #[serde(default)]
    pub transition: TransitionConfig,

    #[serde(default)]
    pub arms: Vec<ArmEntry>,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            initial: Some("point".into()),
            transition: TransitionConfig::default(),
            arms: vec![
                ArmEntry::new("point", ArmConfig::pointing()),
                ArmEntry::new("throw", ArmConfig::throwing()),
            ],
        }
    }
}

impl RigConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arms.is_empty() {
            return Err(ConfigError::EmptyRig);
        }
        self.transition.validate()?;

        let mut seen = HashSet::new();
        for arm in &self.arms {
            if !seen.insert(arm.name.as_str()) {
                return Err(ConfigError::DuplicateArm(arm.name.clone()));
            }
            arm.model.validate()?;
        }

        match &self.initial {
            Some(initial) if !seen.contains(initial.as_str()) => {
                Err(ConfigError::UnknownArm(initial.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Name of the initial posture (explicit, or the first arm).
    pub fn initial_name(&self) -> Option<&str> {
        self.initial
            .as_deref()
            .or_else(|| self.arms.first().map(|a| a.name.as_str()))
    }

    pub fn arm(&self, name: &str) -> Option<&ArmConfig> {
        self.arms.iter().find(|a| a.name == name).map(|a| &a.model)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), arms = config.arms.len(), "loaded rig config");
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
