#![allow(dead_code)]
//! Critter Rig Core (engine-agnostic)
//!
//! Hierarchical creature rigs posed every tick by procedural motion plus an
//! additive keyframe sequencer for authored action clips. Rendering, entity
//! state and persistence live with the host; this crate only computes poses.

pub mod clip;
pub mod config;
pub mod controller;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod motion;
pub mod outputs;
pub mod rig;
pub mod sequencer;
pub mod skeleton;
pub mod stored_rig;

// Re-exports for hosts and creature crates
pub use clip::{AngleUnits, ClipBuilder, ClipDef, ClipLibrary, NodeDelta, SegmentDef, TransformOp};
pub use config::{Config, FaceTargetLimits, NonFinitePolicy};
pub use controller::{RigAsset, RigController};
pub use error::{AnimError, ClipError, RigError};
pub use ids::{ClipId, NodeId};
pub use inputs::AnimInputs;
pub use motion::{Axis, CompiledMotion, MotionProgram, MotionStep, Oscillator, Phase};
pub use outputs::{PoseSink, PoseSnapshot, PosedNode};
pub use rig::{NodePose, Rig};
pub use sequencer::{advance, AppliedDeltas, SequencerState};
pub use skeleton::{Cuboid, NodeDef, RigDefinition, Skeleton};
pub use stored_rig::{parse_clip_json, parse_motion_json, parse_rig_asset_json, parse_rig_json};
