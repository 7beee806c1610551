//! Controller configuration.

use serde::{Deserialize, Serialize};

use crate::error::AnimError;

/// What the controller does with a NaN/infinite input scalar.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Fail the tick with [`AnimError::NonFiniteInput`].
    #[default]
    Reject,
    /// Replace the offending value with 0.0 and log a warning.
    Zero,
}

/// Clamp applied to look-at angles before they are spread across a chain.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceTargetLimits {
    pub max_yaw_degrees: f32,
    pub max_pitch_degrees: f32,
}

impl Default for FaceTargetLimits {
    fn default() -> Self {
        Self {
            max_yaw_degrees: 75.0,
            max_pitch_degrees: 60.0,
        }
    }
}

/// Configuration shared by every controller spawned from an asset.
/// Keep this minimal; expand without breaking the JSON shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub non_finite: NonFinitePolicy,
    #[serde(default)]
    pub face_target: FaceTargetLimits,
}

impl Config {
    /// Parse a host-supplied JSON config; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, AnimError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AnimError> {
        let limits = self.face_target;
        if !(limits.max_yaw_degrees.is_finite() && limits.max_yaw_degrees >= 0.0)
            || !(limits.max_pitch_degrees.is_finite() && limits.max_pitch_degrees >= 0.0)
        {
            return Err(AnimError::InvalidConfig(
                "face_target limits must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}
