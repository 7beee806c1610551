//! Declarative rig definitions and the immutable skeleton arena built from them.
//!
//! A `RigDefinition` is a flat table of `NodeDef`s that name their parent. It is
//! validated and compiled once per creature type into a `Skeleton`, which is
//! shared (via `Arc`) by every rig instance of that type. Nodes are stored in
//! parent-before-child order so a single forward pass can resolve the hierarchy.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::ids::NodeId;

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Box geometry attached to a node. Opaque to the animation core; carried for
/// the render collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub origin: [f32; 3],
    pub size: [u32; 3],
    #[serde(default)]
    /// Texel origin; authored sheets occasionally start left of the edge.
    pub texture_offset: [i32; 2],
    #[serde(default)]
    pub inflate: f32,
}

/// One authored rigid part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Rotation point relative to the parent, in model units.
    #[serde(default)]
    pub pivot: [f32; 3],
    /// Rest rotation in radians (x, y, z).
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Mirrors texture sampling only.
    #[serde(default)]
    pub mirror: bool,
    #[serde(default)]
    pub cuboid: Option<Cuboid>,
}

impl NodeDef {
    pub fn new(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
            pivot: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
            mirror: false,
            cuboid: None,
        }
    }

    pub fn pivot(mut self, x: f32, y: f32, z: f32) -> Self {
        self.pivot = [x, y, z];
        self
    }

    pub fn rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = [x, y, z];
        self
    }

    pub fn scale(mut self, s: f32) -> Self {
        self.scale = [s, s, s];
        self
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }

    pub fn cuboid(mut self, origin: [f32; 3], size: [u32; 3], texture_offset: [i32; 2]) -> Self {
        self.cuboid = Some(Cuboid {
            origin,
            size,
            texture_offset,
            inflate: 0.0,
        });
        self
    }
}

/// Flat, serializable description of a creature's node tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigDefinition {
    pub name: String,
    #[serde(default)]
    pub texture_size: [u32; 2],
    pub nodes: Vec<NodeDef>,
}

impl RigDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_size: [0, 0],
            nodes: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: NodeDef) -> Self {
        self.nodes.push(node);
        self
    }

    /// Overwrite the authored rest rotation of `name`. Construction-time only:
    /// once a `Skeleton` is built the rest pose is frozen.
    pub fn apply_default_pose(&mut self, name: &str, rotation: [f32; 3]) -> Result<(), RigError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.name == name)
            .ok_or_else(|| RigError::UnknownNode(name.to_string()))?;
        node.rotation = rotation;
        Ok(())
    }
}

/// A node in the compiled arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub pivot: [f32; 3],
    pub base_rotation: [f32; 3],
    pub base_scale: [f32; 3],
    pub mirror: bool,
    pub cuboid: Option<Cuboid>,
}

/// Immutable node tree for one creature type.
#[derive(Clone, Debug)]
pub struct Skeleton {
    name: String,
    texture_size: [u32; 2],
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
    root: NodeId,
}

fn all_finite(v: &[f32]) -> bool {
    v.iter().all(|x| x.is_finite())
}

impl Skeleton {
    /// Validate a definition and build the arena.
    pub fn from_definition(def: &RigDefinition) -> Result<Self, RigError> {
        if def.nodes.is_empty() {
            return Err(RigError::Empty);
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(def.nodes.len());
        let mut root: Option<usize> = None;
        for (i, n) in def.nodes.iter().enumerate() {
            if index.insert(n.name.as_str(), i).is_some() {
                return Err(RigError::DuplicateNode(n.name.clone()));
            }
            for (field, values) in [
                ("pivot", &n.pivot),
                ("rotation", &n.rotation),
                ("scale", &n.scale),
            ] {
                if !all_finite(values) {
                    return Err(RigError::NonFinite {
                        node: n.name.clone(),
                        field,
                    });
                }
            }
            if n.parent.is_none() {
                if let Some(first) = root {
                    return Err(RigError::MultipleRoots {
                        first: def.nodes[first].name.clone(),
                        second: n.name.clone(),
                    });
                }
                root = Some(i);
            }
        }
        let root = root.ok_or(RigError::NoRoot)?;

        // Definition index of each node's parent.
        let mut parent_of: Vec<Option<usize>> = Vec::with_capacity(def.nodes.len());
        for n in &def.nodes {
            match &n.parent {
                None => parent_of.push(None),
                Some(p) => {
                    let pi = *index.get(p.as_str()).ok_or_else(|| RigError::UnknownParent {
                        node: n.name.clone(),
                        parent: p.clone(),
                    })?;
                    parent_of.push(Some(pi));
                }
            }
        }

        // Every chain must terminate at the root within n steps.
        for (i, n) in def.nodes.iter().enumerate() {
            let mut cur = i;
            let mut steps = 0usize;
            while let Some(p) = parent_of[cur] {
                cur = p;
                steps += 1;
                if steps > def.nodes.len() {
                    return Err(RigError::Cycle(n.name.clone()));
                }
            }
        }

        // Breadth-first from the root gives parent-before-child order.
        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); def.nodes.len()];
        for (i, p) in parent_of.iter().enumerate() {
            if let Some(p) = p {
                children_of[*p].push(i);
            }
        }
        let mut order: Vec<usize> = Vec::with_capacity(def.nodes.len());
        order.push(root);
        let mut cursor = 0;
        while cursor < order.len() {
            let cur = order[cursor];
            order.extend(children_of[cur].iter().copied());
            cursor += 1;
        }
        debug_assert_eq!(order.len(), def.nodes.len());

        let mut remap = vec![0u32; def.nodes.len()];
        for (new_idx, old_idx) in order.iter().enumerate() {
            remap[*old_idx] = new_idx as u32;
        }

        let mut nodes = Vec::with_capacity(order.len());
        let mut by_name = HashMap::with_capacity(order.len());
        for (new_idx, old_idx) in order.iter().enumerate() {
            let d = &def.nodes[*old_idx];
            nodes.push(Node {
                name: d.name.clone(),
                parent: parent_of[*old_idx].map(|p| NodeId(remap[p])),
                children: children_of[*old_idx]
                    .iter()
                    .map(|c| NodeId(remap[*c]))
                    .collect(),
                pivot: d.pivot,
                base_rotation: d.rotation,
                base_scale: d.scale,
                mirror: d.mirror,
                cuboid: d.cuboid.clone(),
            });
            by_name.insert(d.name.clone(), NodeId(new_idx as u32));
        }

        log::debug!(
            "built skeleton '{}' with {} nodes (root '{}')",
            def.name,
            nodes.len(),
            def.nodes[root].name
        );

        Ok(Self {
            name: def.name.clone(),
            texture_size: def.texture_size,
            nodes,
            by_name,
            root: NodeId(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture_size(&self) -> [u32; 2] {
        self.texture_size
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Nodes in parent-before-child order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> Result<NodeId, RigError> {
        self.find(name)
            .ok_or_else(|| RigError::UnknownNode(name.to_string()))
    }
}
