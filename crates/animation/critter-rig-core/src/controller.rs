//! Controller: per-instance tick driver over a shared creature asset.
//!
//! Every tick runs, in order: input validation, rig reset, the motion
//! program, one sequencer step with its offsets added on top. The posed rig
//! is then returned or handed to a [`PoseSink`].

use std::sync::Arc;

use crate::clip::{ClipDef, ClipLibrary};
use crate::config::Config;
use crate::error::AnimError;
use crate::ids::ClipId;
use crate::inputs::AnimInputs;
use crate::motion::program::{CompiledMotion, MotionProgram};
use crate::outputs::{PoseSink, PoseSnapshot};
use crate::rig::Rig;
use crate::sequencer::{self, SequencerState};
use crate::skeleton::{RigDefinition, Skeleton};

/// Immutable data shared by every instance of one creature type. Only
/// [`RigAsset::build`] constructs one, so the config it carries is validated.
#[derive(Clone, Debug)]
pub struct RigAsset {
    skeleton: Arc<Skeleton>,
    motion: Arc<CompiledMotion>,
    clips: Arc<ClipLibrary>,
    config: Config,
}

impl RigAsset {
    /// Build the skeleton, compile the motion program and register every clip.
    pub fn build(
        def: &RigDefinition,
        program: &MotionProgram,
        clips: &[ClipDef],
        config: Config,
    ) -> Result<Self, AnimError> {
        config.validate()?;
        let skeleton = Skeleton::from_definition(def)?;
        let motion = program.compile(&skeleton)?;
        let mut library = ClipLibrary::new();
        for clip in clips {
            library.register(clip, &skeleton)?;
        }
        log::debug!(
            "rig asset '{}': {} nodes, {} motion steps, {} clips",
            skeleton.name(),
            skeleton.len(),
            motion.len(),
            library.len()
        );
        Ok(Self {
            skeleton: Arc::new(skeleton),
            motion: Arc::new(motion),
            clips: Arc::new(library),
            config,
        })
    }

    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    pub fn motion(&self) -> &CompiledMotion {
        &self.motion
    }

    pub fn clips(&self) -> &ClipLibrary {
        &self.clips
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clip_id(&self, name: &str) -> Option<ClipId> {
        self.clips.id(name)
    }

    /// New controller with the rig at rest and no clip active.
    pub fn spawn(&self) -> RigController {
        RigController {
            asset: self.clone(),
            rig: Rig::new(self.skeleton.clone()),
            state: SequencerState::default(),
            last_sampled: SequencerState::default(),
        }
    }
}

/// Pose driver for one creature instance.
#[derive(Clone, Debug)]
pub struct RigController {
    asset: RigAsset,
    rig: Rig,
    /// Position the next update samples.
    state: SequencerState,
    /// Position the last update sampled; `repose` reuses it.
    last_sampled: SequencerState,
}

impl RigController {
    pub fn asset(&self) -> &RigAsset {
        &self.asset
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Force a clip switch outside the per-tick request.
    pub fn set_animation(&mut self, clip: ClipId) {
        self.state = self.state.set_animation(clip);
    }

    fn pose_baseline(&mut self, inputs: &AnimInputs) {
        self.rig.reset_to_default_pose();
        self.asset
            .motion
            .apply(&mut self.rig, inputs, &self.asset.config.face_target);
    }

    /// Advance one simulation tick and return the posed rig.
    pub fn update(&mut self, inputs: &AnimInputs) -> Result<&Rig, AnimError> {
        let inputs = inputs.sanitized(self.asset.config.non_finite)?;
        let sampled = self.state.reconcile(inputs.clip).settle(&self.asset.clips)?;
        let (next, deltas) =
            sequencer::advance(&self.asset.clips, sampled, inputs.clip, inputs.partial_tick)?;
        self.pose_baseline(&inputs);
        deltas.apply(&mut self.rig);
        self.state = next;
        self.last_sampled = sampled;
        Ok(&self.rig)
    }

    /// Recompute the pose at the last sampled position without stepping the
    /// sequencer, e.g. for render frames between simulation ticks.
    pub fn repose(&mut self, inputs: &AnimInputs) -> Result<&Rig, AnimError> {
        let inputs = inputs.sanitized(self.asset.config.non_finite)?;
        let deltas = self
            .last_sampled
            .sample(&self.asset.clips, inputs.partial_tick)?;
        self.pose_baseline(&inputs);
        deltas.apply(&mut self.rig);
        Ok(&self.rig)
    }

    /// Update, then hand the rig to the render collaborator.
    pub fn render(&mut self, inputs: &AnimInputs, sink: &mut dyn PoseSink) -> Result<(), AnimError> {
        self.update(inputs)?;
        sink.draw(&self.rig);
        Ok(())
    }

    pub fn snapshot(&self) -> PoseSnapshot {
        self.rig.snapshot()
    }
}
