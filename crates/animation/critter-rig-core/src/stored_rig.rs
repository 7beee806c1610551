use serde::Deserialize;

use crate::clip::ClipDef;
use crate::config::Config;
use crate::controller::RigAsset;
use crate::error::AnimError;
use crate::motion::program::MotionProgram;
use crate::skeleton::{RigDefinition, Skeleton};

/// Parse a rig definition document and check that it forms a valid tree.
pub fn parse_rig_json(s: &str) -> Result<RigDefinition, AnimError> {
    let def: RigDefinition = serde_json::from_str(s)?;
    Skeleton::from_definition(&def)?;
    Ok(def)
}

/// Parse one clip document. Node names are checked later, on registration.
pub fn parse_clip_json(s: &str) -> Result<ClipDef, AnimError> {
    let def: ClipDef = serde_json::from_str(s)?;
    def.validate()?;
    Ok(def)
}

pub fn parse_motion_json(s: &str) -> Result<MotionProgram, AnimError> {
    Ok(serde_json::from_str(s)?)
}

/// Single-document bundle: rig, motion program, clips and optional config.
#[derive(Deserialize)]
struct StoredRigAsset {
    rig: RigDefinition,
    #[serde(default)]
    motion: MotionProgram,
    #[serde(default)]
    clips: Vec<ClipDef>,
    #[serde(default)]
    config: Config,
}

/// Parse a bundle document straight into a ready-to-spawn asset.
pub fn parse_rig_asset_json(s: &str) -> Result<RigAsset, AnimError> {
    let stored: StoredRigAsset = serde_json::from_str(s)?;
    RigAsset::build(&stored.rig, &stored.motion, &stored.clips, stored.config)
}
