//! Per-tick scalars supplied by the entity collaborator.

use serde::{Deserialize, Serialize};

use crate::config::NonFinitePolicy;
use crate::error::AnimError;
use crate::ids::ClipId;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimInputs {
    /// Age-based phase driving idle breathing.
    pub idle_time: f32,
    /// Locomotion phase.
    pub limb_swing: f32,
    /// Locomotion magnitude, usually in [0, 1].
    pub limb_swing_amount: f32,
    /// Look-at yaw relative to the body, degrees.
    pub head_yaw: f32,
    /// Look-at pitch, degrees.
    pub head_pitch: f32,
    /// Fraction of the way to the next simulation tick.
    pub partial_tick: f32,
    pub clip: Option<ClipId>,
}

impl AnimInputs {
    fn fields_mut(&mut self) -> [(&'static str, &mut f32); 6] {
        [
            ("idle_time", &mut self.idle_time),
            ("limb_swing", &mut self.limb_swing),
            ("limb_swing_amount", &mut self.limb_swing_amount),
            ("head_yaw", &mut self.head_yaw),
            ("head_pitch", &mut self.head_pitch),
            ("partial_tick", &mut self.partial_tick),
        ]
    }

    /// Enforce `policy` on every scalar, returning the values to use this tick.
    pub fn sanitized(mut self, policy: NonFinitePolicy) -> Result<Self, AnimError> {
        for (field, value) in self.fields_mut() {
            if value.is_finite() {
                continue;
            }
            match policy {
                NonFinitePolicy::Reject => {
                    return Err(AnimError::NonFiniteInput {
                        field,
                        value: *value,
                    })
                }
                NonFinitePolicy::Zero => {
                    log::warn!("non-finite input '{}' ({}) replaced by 0", field, value);
                    *value = 0.0;
                }
            }
        }
        Ok(self)
    }
}
