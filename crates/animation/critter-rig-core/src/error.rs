//! Error types for rig construction, clip authoring and per-tick updates.

use thiserror::Error;

use crate::ids::ClipId;

/// Problems found while building a skeleton or resolving node names against it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    #[error("rig definition has no nodes")]
    Empty,
    #[error("duplicate node name '{0}'")]
    DuplicateNode(String),
    #[error("node '{node}' references unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },
    #[error("rig has no root node")]
    NoRoot,
    #[error("rig has more than one root: '{first}' and '{second}'")]
    MultipleRoots { first: String, second: String },
    #[error("node '{0}' is part of a parent cycle")]
    Cycle(String),
    #[error("unknown node '{0}'")]
    UnknownNode(String),
    #[error("node '{node}' has a non-finite {field}")]
    NonFinite { node: String, field: &'static str },
}

/// Authoring errors for action clips. All of these are programmer errors and
/// surface when a clip is built or registered, never during playback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    #[error("clip '{clip}': segment {segment} has zero duration")]
    ZeroDuration { clip: String, segment: usize },
    #[error("clip '{clip}': start_keyframe called inside an open keyframe")]
    NestedKeyframe { clip: String },
    #[error("clip '{clip}': end_keyframe called without start_keyframe")]
    UnopenedKeyframe { clip: String },
    #[error("clip '{clip}': keyframe left open at build")]
    UnclosedKeyframe { clip: String },
    #[error("clip '{clip}': transform op on '{node}' outside a keyframe")]
    OpOutsideKeyframe { clip: String, node: String },
    #[error("clip '{clip}': nothing may follow reset_keyframe")]
    AfterReset { clip: String },
    #[error("clip '{clip}': hold segment {segment} must not carry transform ops")]
    HoldWithOps { clip: String, segment: usize },
    #[error("clip '{clip}': op on '{node}' has a non-finite value")]
    NonFinite { clip: String, node: String },
    #[error("clip '{clip}' references unknown node '{node}'")]
    UnknownNode { clip: String, node: String },
    #[error("clip '{0}' is already registered")]
    DuplicateClip(String),
}

/// Errors surfaced to the caller of a per-tick update or a loader.
#[derive(Debug, Error)]
pub enum AnimError {
    #[error("non-finite input '{field}': {value}")]
    NonFiniteInput { field: &'static str, value: f32 },
    #[error("unknown clip id {0:?}")]
    UnknownClip(ClipId),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Rig(#[from] RigError),
    #[error(transparent)]
    Clip(#[from] ClipError),
}
