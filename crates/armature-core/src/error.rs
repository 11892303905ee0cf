use thiserror::Error;

/// Top-level error type for armature.
#[derive(Debug, Error)]
pub enum ArmatureError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rig error: {0}")]
    Rig(#[from] RigError),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid elbow_bend_ratio: {0} (must be within [0, 1])")]
    InvalidBendRatio(f32),

    #[error("Non-finite vector for {0}")]
    NonFiniteVector(&'static str),

    #[error("Invalid extension angle range: min={min}, max={max} (min must be < max)")]
    InvalidExtensionRange { min: f32, max: f32 },

    #[error("Invalid transition speed: {0} (must be > 0)")]
    InvalidTransitionSpeed(f32),

    #[error("max_active_transitions must be >= 1")]
    ZeroCapacity,

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Duplicate arm name: {0}")]
    DuplicateArm(String),

    #[error("Unknown arm name: {0}")]
    UnknownArm(String),

    #[error("Rig has no arms")]
    EmptyRig,
}

/// Errors raised when addressing arms inside a rig.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RigError {
    #[error("No arm named {0}")]
    UnknownName(String),

    #[error("No arm registered under {0}")]
    UnknownId(crate::types::ArmId),

    #[error("Arm name already registered: {0}")]
    DuplicateName(String),
}
