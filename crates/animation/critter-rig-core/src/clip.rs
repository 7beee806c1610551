//! Action clips: authoring types, the builder and the compiled library.
//!
//! A clip is an ordered list of timed segments. Each blend segment names the
//! target offsets of the nodes it touches; nodes it does not name blend back
//! toward zero. Compilation resolves node names once so playback only deals
//! with `NodeId`s.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::ClipError;
use crate::ids::{ClipId, IdAllocator, NodeId};
use crate::skeleton::Skeleton;

/// Units for authored rotation values. Translation is always model units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnits {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnits {
    #[inline]
    fn to_radians(self, v: [f32; 3]) -> [f32; 3] {
        match self {
            AngleUnits::Radians => v,
            AngleUnits::Degrees => [v[0].to_radians(), v[1].to_radians(), v[2].to_radians()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOp {
    /// Absolute rotation; the offset is the target minus the node's rest rotation.
    RotateTo { node: String, angles: [f32; 3] },
    RotateBy { node: String, angles: [f32; 3] },
    /// Absolute pivot position; the offset is the target minus the authored pivot.
    MoveTo { node: String, position: [f32; 3] },
    MoveBy { node: String, offset: [f32; 3] },
}

impl TransformOp {
    pub fn node(&self) -> &str {
        match self {
            TransformOp::RotateTo { node, .. }
            | TransformOp::RotateBy { node, .. }
            | TransformOp::MoveTo { node, .. }
            | TransformOp::MoveBy { node, .. } => node,
        }
    }

    fn values(&self) -> [f32; 3] {
        match self {
            TransformOp::RotateTo { angles, .. } | TransformOp::RotateBy { angles, .. } => *angles,
            TransformOp::MoveTo { position, .. } => *position,
            TransformOp::MoveBy { offset, .. } => *offset,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentDef {
    /// Length in ticks; must be at least 1.
    pub duration: u32,
    /// Keep the previous values for `duration` ticks without blending.
    #[serde(default)]
    pub hold: bool,
    #[serde(default)]
    pub ops: Vec<TransformOp>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipDef {
    pub name: String,
    #[serde(default)]
    pub angle_units: AngleUnits,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
    /// Ticks spent blending back to zero after the last segment.
    #[serde(default)]
    pub reset_ticks: u32,
}

impl ClipDef {
    /// Authoring-time checks that do not need a skeleton.
    pub fn validate(&self) -> Result<(), ClipError> {
        for (i, seg) in self.segments.iter().enumerate() {
            if seg.duration == 0 {
                return Err(ClipError::ZeroDuration {
                    clip: self.name.clone(),
                    segment: i,
                });
            }
            if seg.hold && !seg.ops.is_empty() {
                return Err(ClipError::HoldWithOps {
                    clip: self.name.clone(),
                    segment: i,
                });
            }
            for op in &seg.ops {
                if !op.values().iter().all(|v| v.is_finite()) {
                    return Err(ClipError::NonFinite {
                        clip: self.name.clone(),
                        node: op.node().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of ticks from the first segment to the end of the reset blend,
    /// saturating at `u32::MAX`.
    pub fn lifetime(&self) -> u32 {
        self.segments
            .iter()
            .fold(self.reset_ticks, |acc, s| acc.saturating_add(s.duration))
    }

    /// Validate and resolve node names against `skeleton`.
    pub fn compile(&self, skeleton: &Skeleton) -> Result<CompiledClip, ClipError> {
        self.validate()?;
        let mut segments = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            let mut acc: BTreeMap<NodeId, NodeDelta> = BTreeMap::new();
            for op in &seg.ops {
                let id = skeleton.find(op.node()).ok_or_else(|| ClipError::UnknownNode {
                    clip: self.name.clone(),
                    node: op.node().to_string(),
                })?;
                let node = skeleton.node(id);
                let entry = acc.entry(id).or_insert_with(|| NodeDelta::zero(id));
                match op {
                    TransformOp::RotateTo { angles, .. } => {
                        let a = self.angle_units.to_radians(*angles);
                        add3(&mut entry.rotation, sub3(a, node.base_rotation));
                    }
                    TransformOp::RotateBy { angles, .. } => {
                        add3(&mut entry.rotation, self.angle_units.to_radians(*angles));
                    }
                    TransformOp::MoveTo { position, .. } => {
                        add3(&mut entry.translation, sub3(*position, node.pivot));
                    }
                    TransformOp::MoveBy { offset, .. } => {
                        add3(&mut entry.translation, *offset);
                    }
                }
            }
            segments.push(CompiledSegment {
                duration: seg.duration,
                hold: seg.hold,
                targets: acc.into_values().collect(),
            });
        }
        Ok(CompiledClip {
            name: self.name.clone(),
            segments,
            reset_ticks: self.reset_ticks,
        })
    }
}

#[inline]
fn add3(a: &mut [f32; 3], b: [f32; 3]) {
    a[0] += b[0];
    a[1] += b[1];
    a[2] += b[2];
}

#[inline]
fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Chainable authoring in the start/end keyframe vocabulary.
///
/// Misuse is recorded and reported by [`ClipBuilder::build`], so call chains
/// stay linear.
#[derive(Clone, Debug)]
pub struct ClipBuilder {
    def: ClipDef,
    open: Option<SegmentDef>,
    reset: bool,
    error: Option<ClipError>,
}

impl ClipBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: ClipDef {
                name: name.into(),
                angle_units: AngleUnits::Radians,
                segments: Vec::new(),
                reset_ticks: 0,
            },
            open: None,
            reset: false,
            error: None,
        }
    }

    /// Interpret rotation values as degrees.
    pub fn degrees(mut self) -> Self {
        self.def.angle_units = AngleUnits::Degrees;
        self
    }

    fn fail(&mut self, err: ClipError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn guard_reset(&mut self) -> bool {
        if self.reset {
            let clip = self.def.name.clone();
            self.fail(ClipError::AfterReset { clip });
        }
        self.reset
    }

    pub fn start_keyframe(mut self, duration: u32) -> Self {
        if self.guard_reset() {
            return self;
        }
        if self.open.is_some() {
            let clip = self.def.name.clone();
            self.fail(ClipError::NestedKeyframe { clip });
            return self;
        }
        self.open = Some(SegmentDef {
            duration,
            hold: false,
            ops: Vec::new(),
        });
        self
    }

    fn push_op(mut self, op: TransformOp) -> Self {
        if self.guard_reset() {
            return self;
        }
        match self.open.as_mut() {
            Some(seg) => seg.ops.push(op),
            None => {
                let err = ClipError::OpOutsideKeyframe {
                    clip: self.def.name.clone(),
                    node: op.node().to_string(),
                };
                self.fail(err);
            }
        }
        self
    }

    pub fn rotate_to(self, node: &str, x: f32, y: f32, z: f32) -> Self {
        self.push_op(TransformOp::RotateTo {
            node: node.to_string(),
            angles: [x, y, z],
        })
    }

    pub fn rotate_by(self, node: &str, x: f32, y: f32, z: f32) -> Self {
        self.push_op(TransformOp::RotateBy {
            node: node.to_string(),
            angles: [x, y, z],
        })
    }

    pub fn move_to(self, node: &str, x: f32, y: f32, z: f32) -> Self {
        self.push_op(TransformOp::MoveTo {
            node: node.to_string(),
            position: [x, y, z],
        })
    }

    pub fn move_by(self, node: &str, x: f32, y: f32, z: f32) -> Self {
        self.push_op(TransformOp::MoveBy {
            node: node.to_string(),
            offset: [x, y, z],
        })
    }

    pub fn end_keyframe(mut self) -> Self {
        if self.guard_reset() {
            return self;
        }
        match self.open.take() {
            Some(seg) => self.def.segments.push(seg),
            None => {
                let clip = self.def.name.clone();
                self.fail(ClipError::UnopenedKeyframe { clip });
            }
        }
        self
    }

    /// Hold the current values for `duration` ticks.
    pub fn static_keyframe(mut self, duration: u32) -> Self {
        if self.guard_reset() {
            return self;
        }
        if self.open.is_some() {
            let clip = self.def.name.clone();
            self.fail(ClipError::NestedKeyframe { clip });
            return self;
        }
        self.def.segments.push(SegmentDef {
            duration,
            hold: true,
            ops: Vec::new(),
        });
        self
    }

    /// Close the clip: blend back to zero over `ticks`.
    pub fn reset_keyframe(mut self, ticks: u32) -> Self {
        if self.guard_reset() {
            return self;
        }
        if self.open.is_some() {
            let clip = self.def.name.clone();
            self.fail(ClipError::UnclosedKeyframe { clip });
            return self;
        }
        self.def.reset_ticks = ticks;
        self.reset = true;
        self
    }

    pub fn build(self) -> Result<ClipDef, ClipError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.open.is_some() {
            return Err(ClipError::UnclosedKeyframe {
                clip: self.def.name,
            });
        }
        self.def.validate()?;
        Ok(self.def)
    }
}

/// Resolved offset of one node: rotation in radians, translation in model units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeDelta {
    pub node: NodeId,
    pub rotation: [f32; 3],
    pub translation: [f32; 3],
}

impl NodeDelta {
    pub const fn zero(node: NodeId) -> Self {
        Self {
            node,
            rotation: [0.0; 3],
            translation: [0.0; 3],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledSegment {
    pub duration: u32,
    pub hold: bool,
    /// Sorted by node id.
    pub targets: Vec<NodeDelta>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledClip {
    pub name: String,
    pub segments: Vec<CompiledSegment>,
    pub reset_ticks: u32,
}

impl CompiledClip {
    /// Targets of the last blend segment strictly before `segment`, or an
    /// empty slice when there is none.
    pub fn blend_source(&self, segment: usize) -> &[NodeDelta] {
        self.segments[..segment.min(self.segments.len())]
            .iter()
            .rev()
            .find(|s| !s.hold)
            .map(|s| s.targets.as_slice())
            .unwrap_or(&[])
    }
}

/// Clips registered for one skeleton, addressed by `ClipId`.
#[derive(Debug, Default)]
pub struct ClipLibrary {
    clips: Vec<CompiledClip>,
    by_name: HashMap<String, ClipId>,
    ids: IdAllocator,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `def` against `skeleton` and store it under a fresh id.
    pub fn register(&mut self, def: &ClipDef, skeleton: &Skeleton) -> Result<ClipId, ClipError> {
        if self.by_name.contains_key(&def.name) {
            return Err(ClipError::DuplicateClip(def.name.clone()));
        }
        let compiled = def.compile(skeleton)?;
        let id = self.ids.alloc_clip();
        log::debug!(
            "registered clip '{}' as {:?} ({} segments, lifetime {} ticks)",
            def.name,
            id,
            compiled.segments.len(),
            def.lifetime()
        );
        self.by_name.insert(def.name.clone(), id);
        self.clips.push(compiled);
        Ok(id)
    }

    pub fn get(&self, id: ClipId) -> Option<&CompiledClip> {
        self.clips.get(id.0 as usize)
    }

    pub fn id(&self, name: &str) -> Option<ClipId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{NodeDef, RigDefinition};

    fn skeleton() -> Skeleton {
        let def = RigDefinition::new("rat")
            .with_node(NodeDef::new("body", None).pivot(0.0, 12.0, 0.0))
            .with_node(NodeDef::new("neck", Some("body")).rotation(0.2, 0.0, 0.0))
            .with_node(NodeDef::new("jaw", Some("neck")).pivot(0.0, 1.0, -3.0));
        Skeleton::from_definition(&def).unwrap()
    }

    #[test]
    fn builder_collects_segments_in_order() {
        let def = ClipBuilder::new("bite")
            .start_keyframe(5)
            .rotate_by("jaw", 0.5, 0.0, 0.0)
            .end_keyframe()
            .static_keyframe(2)
            .start_keyframe(3)
            .move_by("body", 0.0, 0.0, -1.0)
            .end_keyframe()
            .reset_keyframe(4)
            .build()
            .unwrap();
        assert_eq!(def.segments.len(), 3);
        assert!(def.segments[1].hold);
        assert_eq!(def.reset_ticks, 4);
        assert_eq!(def.lifetime(), 14);
    }

    #[test]
    fn builder_reports_first_misuse() {
        let err = ClipBuilder::new("c")
            .rotate_by("jaw", 1.0, 0.0, 0.0)
            .end_keyframe()
            .build()
            .unwrap_err();
        assert!(matches!(err, ClipError::OpOutsideKeyframe { .. }));

        let err = ClipBuilder::new("c")
            .start_keyframe(2)
            .start_keyframe(2)
            .build()
            .unwrap_err();
        assert!(matches!(err, ClipError::NestedKeyframe { .. }));

        let err = ClipBuilder::new("c").end_keyframe().build().unwrap_err();
        assert!(matches!(err, ClipError::UnopenedKeyframe { .. }));

        let err = ClipBuilder::new("c").start_keyframe(2).build().unwrap_err();
        assert!(matches!(err, ClipError::UnclosedKeyframe { .. }));

        let err = ClipBuilder::new("c")
            .reset_keyframe(2)
            .static_keyframe(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ClipError::AfterReset { .. }));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = ClipBuilder::new("c")
            .start_keyframe(0)
            .end_keyframe()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ClipError::ZeroDuration {
                clip: "c".into(),
                segment: 0
            }
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = ClipBuilder::new("c")
            .start_keyframe(1)
            .rotate_by("jaw", f32::NAN, 0.0, 0.0)
            .end_keyframe()
            .build()
            .unwrap_err();
        assert!(matches!(err, ClipError::NonFinite { .. }));
    }

    #[test]
    fn compile_resolves_absolute_ops_against_rest_pose() {
        let sk = skeleton();
        let def = ClipBuilder::new("c")
            .start_keyframe(2)
            .rotate_to("neck", 0.5, 0.0, 0.0)
            .rotate_by("neck", 0.1, 0.0, 0.0)
            .move_to("jaw", 0.0, 1.0, -2.0)
            .end_keyframe()
            .build()
            .unwrap();
        let clip = def.compile(&sk).unwrap();
        let targets = &clip.segments[0].targets;
        assert_eq!(targets.len(), 2);
        let neck = sk.find("neck").unwrap();
        let jaw = sk.find("jaw").unwrap();
        let n = targets.iter().find(|d| d.node == neck).unwrap();
        assert!((n.rotation[0] - 0.4).abs() < 1e-6);
        let j = targets.iter().find(|d| d.node == jaw).unwrap();
        assert_eq!(j.translation, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn degrees_are_converted() {
        let sk = skeleton();
        let def = ClipBuilder::new("c")
            .degrees()
            .start_keyframe(1)
            .rotate_by("jaw", 90.0, 0.0, 0.0)
            .end_keyframe()
            .build()
            .unwrap();
        let clip = def.compile(&sk).unwrap();
        let r = clip.segments[0].targets[0].rotation[0];
        assert!((r - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn registration_rejects_unknown_nodes_and_duplicates() {
        let sk = skeleton();
        let mut lib = ClipLibrary::new();
        let bad = ClipBuilder::new("bad")
            .start_keyframe(1)
            .rotate_by("tail", 1.0, 0.0, 0.0)
            .end_keyframe()
            .build()
            .unwrap();
        assert_eq!(
            lib.register(&bad, &sk).unwrap_err(),
            ClipError::UnknownNode {
                clip: "bad".into(),
                node: "tail".into()
            }
        );

        let ok = ClipBuilder::new("ok").reset_keyframe(1).build().unwrap();
        let id = lib.register(&ok, &sk).unwrap();
        assert_eq!(lib.id("ok"), Some(id));
        assert_eq!(lib.get(id).map(|c| c.name.as_str()), Some("ok"));
        assert_eq!(
            lib.register(&ok, &sk).unwrap_err(),
            ClipError::DuplicateClip("ok".into())
        );
    }

    #[test]
    fn lifetime_saturates_on_huge_durations() {
        let def = ClipBuilder::new("long")
            .start_keyframe(u32::MAX - 1)
            .end_keyframe()
            .start_keyframe(5)
            .end_keyframe()
            .reset_keyframe(7)
            .build()
            .unwrap();
        assert_eq!(def.lifetime(), u32::MAX);
    }

    #[test]
    fn blend_source_skips_holds() {
        let sk = skeleton();
        let def = ClipBuilder::new("c")
            .start_keyframe(1)
            .rotate_by("jaw", 1.0, 0.0, 0.0)
            .end_keyframe()
            .static_keyframe(2)
            .start_keyframe(1)
            .end_keyframe()
            .build()
            .unwrap();
        let clip = def.compile(&sk).unwrap();
        assert!(clip.blend_source(0).is_empty());
        assert_eq!(clip.blend_source(1).len(), 1);
        assert_eq!(clip.blend_source(2).len(), 1);
    }

    #[test]
    fn clip_def_reads_from_json() {
        let json = r#"{
            "name": "nod",
            "angle_units": "degrees",
            "segments": [
                { "duration": 4, "ops": [ { "op": "rotate_by", "node": "neck", "angles": [20, 0, 0] } ] },
                { "duration": 2, "hold": true }
            ],
            "reset_ticks": 3
        }"#;
        let def: ClipDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.angle_units, AngleUnits::Degrees);
        assert_eq!(def.lifetime(), 9);
        def.validate().unwrap();
    }
}
