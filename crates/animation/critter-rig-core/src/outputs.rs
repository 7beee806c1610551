//! Output contracts toward the render collaborator.
//!
//! The core never draws. Hosts either read the posed [`Rig`] directly, implement
//! [`PoseSink`] and hand it to `RigController::render`, or take a serializable
//! [`PoseSnapshot`].

use serde::{Deserialize, Serialize};

use crate::rig::Rig;

/// Resolved values of one node after a full tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PosedNode {
    pub name: String,
    pub rotation: [f32; 3],
    pub translation: [f32; 3],
    pub scale: [f32; 3],
    /// Column-major model-space matrix.
    pub world: [[f32; 4]; 4],
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    pub rig: String,
    #[serde(default)]
    pub nodes: Vec<PosedNode>,
}

impl PoseSnapshot {
    pub fn node(&self, name: &str) -> Option<&PosedNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Consumer of the final pose (mesh drawing lives behind this trait).
pub trait PoseSink {
    fn draw(&mut self, rig: &Rig);
}
