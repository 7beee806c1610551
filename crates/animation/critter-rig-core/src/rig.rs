//! Per-instance pose over a shared skeleton.

use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::error::RigError;
use crate::ids::NodeId;
use crate::outputs::{PoseSnapshot, PosedNode};
use crate::skeleton::Skeleton;

/// Mutable per-tick values of one node. Recomputed from scratch every tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodePose {
    /// Radians (x, y, z).
    pub rotation: [f32; 3],
    /// Offset added to the pivot, in model units.
    pub translation: [f32; 3],
    pub scale: [f32; 3],
}

/// A skeleton plus the pose of one creature instance.
#[derive(Clone, Debug)]
pub struct Rig {
    skeleton: Arc<Skeleton>,
    pose: Vec<NodePose>,
}

#[inline]
fn finite3(v: [f32; 3]) -> bool {
    v[0].is_finite() && v[1].is_finite() && v[2].is_finite()
}

impl Rig {
    pub fn new(skeleton: Arc<Skeleton>) -> Self {
        let mut rig = Self {
            pose: Vec::with_capacity(skeleton.len()),
            skeleton,
        };
        rig.reset_to_default_pose();
        rig
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn shared_skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Restore every node to its authored rest pose. Must run before any
    /// per-tick pose computation.
    pub fn reset_to_default_pose(&mut self) {
        self.pose.clear();
        self.pose.extend(self.skeleton.nodes().iter().map(|n| NodePose {
            rotation: n.base_rotation,
            translation: [0.0; 3],
            scale: n.base_scale,
        }));
    }

    /// Named handle lookup.
    pub fn handle(&self, name: &str) -> Result<NodeId, RigError> {
        self.skeleton.resolve(name)
    }

    pub fn pose(&self, id: NodeId) -> &NodePose {
        &self.pose[id.index()]
    }

    pub fn poses(&self) -> &[NodePose] {
        &self.pose
    }

    pub fn add_rotation(&mut self, id: NodeId, delta: [f32; 3]) {
        if !finite3(delta) {
            log::warn!(
                "dropping non-finite rotation delta for '{}'",
                self.skeleton.node(id).name
            );
            return;
        }
        let r = &mut self.pose[id.index()].rotation;
        r[0] += delta[0];
        r[1] += delta[1];
        r[2] += delta[2];
    }

    pub fn add_translation(&mut self, id: NodeId, delta: [f32; 3]) {
        if !finite3(delta) {
            log::warn!(
                "dropping non-finite translation delta for '{}'",
                self.skeleton.node(id).name
            );
            return;
        }
        let t = &mut self.pose[id.index()].translation;
        t[0] += delta[0];
        t[1] += delta[1];
        t[2] += delta[2];
    }

    pub fn set_scale(&mut self, id: NodeId, scale: [f32; 3]) {
        if !finite3(scale) {
            log::warn!(
                "dropping non-finite scale for '{}'",
                self.skeleton.node(id).name
            );
            return;
        }
        self.pose[id.index()].scale = scale;
    }

    /// Local matrix of a node: T(pivot + translation) * Rz * Ry * Rx * S.
    pub fn local_transform(&self, id: NodeId) -> Mat4 {
        let node = self.skeleton.node(id);
        let p = &self.pose[id.index()];
        let origin = Vec3::from(node.pivot) + Vec3::from(p.translation);
        let rot = Quat::from_euler(EulerRot::ZYX, p.rotation[2], p.rotation[1], p.rotation[0]);
        Mat4::from_scale_rotation_translation(Vec3::from(p.scale), rot, origin)
    }

    /// Model-space matrices for every node, indexed like the skeleton arena.
    pub fn world_transforms(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.pose.len());
        for (i, node) in self.skeleton.nodes().iter().enumerate() {
            let local = self.local_transform(NodeId(i as u32));
            let world = match node.parent {
                // Parents precede children in the arena.
                Some(p) => out[p.index()] * local,
                None => local,
            };
            out.push(world);
        }
        out
    }

    /// Serializable view of the final pose for the render collaborator.
    pub fn snapshot(&self) -> PoseSnapshot {
        let worlds = self.world_transforms();
        let nodes = self
            .skeleton
            .nodes()
            .iter()
            .zip(self.pose.iter())
            .zip(worlds.iter())
            .map(|((node, pose), world)| PosedNode {
                name: node.name.clone(),
                rotation: pose.rotation,
                translation: pose.translation,
                scale: pose.scale,
                world: world.to_cols_array_2d(),
            })
            .collect();
        PoseSnapshot {
            rig: self.skeleton.name().to_string(),
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{NodeDef, RigDefinition};

    fn rig() -> Rig {
        let def = RigDefinition::new("arm")
            .with_node(NodeDef::new("shoulder", None).pivot(0.0, 10.0, 0.0).rotation(0.5, 0.0, 0.0))
            .with_node(
                NodeDef::new("elbow", Some("shoulder"))
                    .pivot(0.0, 4.0, 0.0)
                    .scale(0.99),
            );
        Rig::new(Arc::new(Skeleton::from_definition(&def).unwrap()))
    }

    #[test]
    fn reset_restores_rest_values() {
        let mut rig = rig();
        let s = rig.handle("shoulder").unwrap();
        let e = rig.handle("elbow").unwrap();
        rig.add_rotation(s, [1.0, 2.0, 3.0]);
        rig.add_translation(e, [0.0, -1.0, 0.0]);
        rig.set_scale(e, [2.0; 3]);
        rig.reset_to_default_pose();
        assert_eq!(rig.pose(s).rotation, [0.5, 0.0, 0.0]);
        assert_eq!(rig.pose(s).translation, [0.0; 3]);
        assert_eq!(rig.pose(e).scale, [0.99; 3]);
        assert_eq!(rig.pose(e).translation, [0.0; 3]);
    }

    #[test]
    fn non_finite_deltas_are_not_stored() {
        let mut rig = rig();
        let s = rig.handle("shoulder").unwrap();
        rig.add_rotation(s, [f32::NAN, 0.0, 0.0]);
        rig.add_translation(s, [0.0, f32::INFINITY, 0.0]);
        rig.set_scale(s, [f32::NEG_INFINITY, 1.0, 1.0]);
        assert_eq!(rig.pose(s).rotation, [0.5, 0.0, 0.0]);
        assert_eq!(rig.pose(s).translation, [0.0; 3]);
        assert_eq!(rig.pose(s).scale, [1.0; 3]);
    }

    #[test]
    fn world_transform_composes_parent_chain() {
        let mut rig = rig();
        let s = rig.handle("shoulder").unwrap();
        let e = rig.handle("elbow").unwrap();
        rig.reset_to_default_pose();
        // Zero out the shoulder rotation so the composition is a pure translation.
        rig.add_rotation(s, [-0.5, 0.0, 0.0]);
        rig.set_scale(e, [1.0; 3]);
        let worlds = rig.world_transforms();
        let origin = worlds[e.index()].transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 14.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn snapshot_lists_every_node() {
        let rig = rig();
        let snap = rig.snapshot();
        assert_eq!(snap.rig, "arm");
        assert_eq!(snap.nodes.len(), 2);
        assert_eq!(snap.nodes[0].name, "shoulder");
        assert_eq!(snap.nodes[0].rotation, [0.5, 0.0, 0.0]);
    }
}
