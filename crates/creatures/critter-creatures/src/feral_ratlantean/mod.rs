//! Feral ratlantean: a hunched, tattered rat with a four-link tail.
//!
//! Bundles the node table, the procedural motion program and the three
//! action clips into one shared [`RigAsset`].

mod clips;
mod motion;
mod rig;

use critter_rig_core::{AnimError, ClipId, Config, RigAsset};

pub use clips::{clips, FeralRatlanteanAnimation};
pub use motion::motion_program;
pub use rig::{rig_definition, RIG_NAME, TAIL};

/// Build the shared asset every ratlantean instance spawns from.
pub fn asset(config: Config) -> Result<RigAsset, AnimError> {
    let clips = clips()?;
    let asset = RigAsset::build(&rig_definition(), &motion_program(), &clips, config)?;
    log::debug!("{} asset ready ({} clips)", RIG_NAME, asset.clips().len());
    Ok(asset)
}

impl FeralRatlanteanAnimation {
    /// Clip id of this action inside `asset`.
    pub fn id(self, asset: &RigAsset) -> Option<ClipId> {
        asset.clip_id(self.clip_name())
    }
}
