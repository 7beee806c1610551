//! Keyframe sequencer as an explicit state value.
//!
//! `SequencerState` is the position the next [`advance`] samples. `advance`
//! is pure: it reconciles the state with the requested clip, samples the
//! blended offsets at that position and returns the state one tick later.

use serde::{Deserialize, Serialize};

use crate::clip::{ClipLibrary, CompiledClip, NodeDelta};
use crate::error::AnimError;
use crate::ids::{ClipId, NodeId};
use crate::rig::Rig;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SequencerState {
    /// No clip active. `last` remembers a clip that ran to completion so a
    /// request that is still asserting it does not restart it; an empty
    /// request forgets it.
    Idle { last: Option<ClipId> },
    PlayingClip {
        clip: ClipId,
        segment: usize,
        tick: u32,
    },
    /// Blending back to zero; `remaining` counts down to 1.
    HoldingReset { clip: ClipId, remaining: u32 },
}

impl Default for SequencerState {
    fn default() -> Self {
        SequencerState::Idle { last: None }
    }
}

impl SequencerState {
    /// Clip currently playing or resetting.
    pub fn active_clip(&self) -> Option<ClipId> {
        match *self {
            SequencerState::Idle { .. } => None,
            SequencerState::PlayingClip { clip, .. } | SequencerState::HoldingReset { clip, .. } => {
                Some(clip)
            }
        }
    }

    /// Switch to `clip` unless it is already the active one. No cross-fade:
    /// the new clip starts at segment 0, tick 0.
    pub fn set_animation(self, clip: ClipId) -> Self {
        if self.active_clip() == Some(clip) {
            return self;
        }
        log::debug!("sequencer: switching to clip {:?}", clip);
        SequencerState::PlayingClip {
            clip,
            segment: 0,
            tick: 0,
        }
    }

    /// Apply the per-tick clip request.
    pub fn reconcile(self, request: Option<ClipId>) -> Self {
        match (self, request) {
            (SequencerState::Idle { .. }, None) => SequencerState::Idle { last: None },
            (_, None) => {
                log::debug!("sequencer: clip request cleared");
                SequencerState::Idle {
                    last: self.active_clip(),
                }
            }
            (SequencerState::Idle { last: Some(last) }, Some(req)) if last == req => self,
            (_, Some(req)) => self.set_animation(req),
        }
    }

    /// Move past a segment index the clip does not have. A clip authored with
    /// only a reset keyframe starts directly in its reset blend.
    pub fn settle(self, library: &ClipLibrary) -> Result<Self, AnimError> {
        match self {
            SequencerState::PlayingClip { clip, segment, .. } => {
                let c = lookup(library, clip)?;
                if segment < c.segments.len() {
                    Ok(self)
                } else {
                    Ok(enter_reset(c, clip))
                }
            }
            _ => Ok(self),
        }
    }

    /// Offsets at this position, with `partial_tick` in [0, 1] added to the
    /// tick counter.
    pub fn sample(&self, library: &ClipLibrary, partial_tick: f32) -> Result<AppliedDeltas, AnimError> {
        let partial = if partial_tick.is_finite() {
            partial_tick.clamp(0.0, 1.0)
        } else {
            0.0
        };
        match *self {
            SequencerState::Idle { .. } => Ok(AppliedDeltas::default()),
            SequencerState::PlayingClip { clip, segment, tick } => {
                let c = lookup(library, clip)?;
                Ok(sample_segment(c, segment, tick, partial))
            }
            SequencerState::HoldingReset { clip, remaining } => {
                let c = lookup(library, clip)?;
                let from = c.blend_source(c.segments.len());
                let total = c.reset_ticks.max(1) as f32;
                let elapsed = c.reset_ticks.saturating_sub(remaining) as f32;
                let k = ((elapsed + partial) / total).min(1.0);
                Ok(AppliedDeltas {
                    deltas: lerp_segment(from, &[], k),
                })
            }
        }
    }

    /// Move one tick forward.
    pub fn step(self, library: &ClipLibrary) -> Result<Self, AnimError> {
        let next = match self {
            SequencerState::Idle { .. } => self,
            SequencerState::PlayingClip { clip, segment, tick } => {
                let c = lookup(library, clip)?;
                let tick = tick + 1;
                match c.segments.get(segment) {
                    Some(seg) if tick < seg.duration => SequencerState::PlayingClip { clip, segment, tick },
                    _ if segment + 1 < c.segments.len() => {
                        log::trace!("clip '{}': entering segment {}", c.name, segment + 1);
                        SequencerState::PlayingClip {
                            clip,
                            segment: segment + 1,
                            tick: 0,
                        }
                    }
                    _ => enter_reset(c, clip),
                }
            }
            SequencerState::HoldingReset { clip, remaining } => {
                if remaining > 1 {
                    SequencerState::HoldingReset {
                        clip,
                        remaining: remaining - 1,
                    }
                } else {
                    log::debug!("sequencer: clip {:?} finished", clip);
                    SequencerState::Idle { last: Some(clip) }
                }
            }
        };
        Ok(next)
    }
}

fn enter_reset(c: &CompiledClip, clip: ClipId) -> SequencerState {
    if c.reset_ticks == 0 {
        log::debug!("sequencer: clip '{}' finished", c.name);
        SequencerState::Idle { last: Some(clip) }
    } else {
        log::trace!("clip '{}': reset blend over {} ticks", c.name, c.reset_ticks);
        SequencerState::HoldingReset {
            clip,
            remaining: c.reset_ticks,
        }
    }
}

fn lookup(library: &ClipLibrary, clip: ClipId) -> Result<&CompiledClip, AnimError> {
    library.get(clip).ok_or(AnimError::UnknownClip(clip))
}

fn sample_segment(c: &CompiledClip, segment: usize, tick: u32, partial: f32) -> AppliedDeltas {
    let Some(seg) = c.segments.get(segment) else {
        return AppliedDeltas::default();
    };
    let from = c.blend_source(segment);
    if seg.hold {
        return AppliedDeltas {
            deltas: from.to_vec(),
        };
    }
    let k = ((tick as f32 + partial) / seg.duration as f32).min(1.0);
    AppliedDeltas {
        deltas: lerp_segment(from, &seg.targets, k),
    }
}

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], k: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * k,
        a[1] + (b[1] - a[1]) * k,
        a[2] + (b[2] - a[2]) * k,
    ]
}

/// Blend two node-sorted target lists. A node missing on either side counts
/// as zero there. `k = 0` yields `from`, `k = 1` yields `to`.
pub fn lerp_segment(from: &[NodeDelta], to: &[NodeDelta], k: f32) -> Vec<NodeDelta> {
    let mut out = Vec::with_capacity(from.len().max(to.len()));
    let (mut i, mut j) = (0, 0);
    while i < from.len() || j < to.len() {
        let (a, b) = match (from.get(i), to.get(j)) {
            (Some(a), Some(b)) if a.node == b.node => {
                i += 1;
                j += 1;
                (*a, *b)
            }
            (Some(a), Some(b)) if a.node < b.node => {
                i += 1;
                (*a, NodeDelta::zero(a.node))
            }
            (Some(a), None) => {
                i += 1;
                (*a, NodeDelta::zero(a.node))
            }
            (_, Some(b)) => {
                j += 1;
                (NodeDelta::zero(b.node), *b)
            }
            (None, None) => break,
        };
        out.push(NodeDelta {
            node: a.node,
            rotation: lerp3(a.rotation, b.rotation, k),
            translation: lerp3(a.translation, b.translation, k),
        });
    }
    out
}

/// Offsets produced by one sequencer sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppliedDeltas {
    pub deltas: Vec<NodeDelta>,
}

impl AppliedDeltas {
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeDelta> {
        self.deltas.iter().find(|d| d.node == node)
    }

    /// True when every offset is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.deltas
            .iter()
            .all(|d| d.rotation == [0.0; 3] && d.translation == [0.0; 3])
    }

    /// Add every offset on top of the rig's current pose.
    pub fn apply(&self, rig: &mut Rig) {
        for d in &self.deltas {
            rig.add_rotation(d.node, d.rotation);
            rig.add_translation(d.node, d.translation);
        }
    }
}

/// Reconcile with `request`, sample, then step one tick.
pub fn advance(
    library: &ClipLibrary,
    state: SequencerState,
    request: Option<ClipId>,
    partial_tick: f32,
) -> Result<(SequencerState, AppliedDeltas), AnimError> {
    let current = state.reconcile(request).settle(library)?;
    let deltas = current.sample(library, partial_tick)?;
    let next = current.step(library)?;
    Ok((next, deltas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipBuilder;
    use crate::skeleton::{NodeDef, RigDefinition, Skeleton};

    fn setup() -> (Skeleton, ClipLibrary, ClipId, ClipId) {
        let def = RigDefinition::new("rat")
            .with_node(NodeDef::new("body", None))
            .with_node(NodeDef::new("jaw", Some("body")));
        let sk = Skeleton::from_definition(&def).unwrap();
        let mut lib = ClipLibrary::new();
        let a = ClipBuilder::new("a")
            .start_keyframe(5)
            .rotate_by("jaw", 1.0, 0.0, 0.0)
            .end_keyframe()
            .start_keyframe(2)
            .rotate_by("jaw", 0.5, 0.0, 0.0)
            .move_by("body", 0.0, 0.0, 2.0)
            .end_keyframe()
            .reset_keyframe(3)
            .build()
            .unwrap();
        let b = ClipBuilder::new("b")
            .start_keyframe(4)
            .rotate_by("body", 0.0, 1.0, 0.0)
            .end_keyframe()
            .reset_keyframe(1)
            .build()
            .unwrap();
        let a = lib.register(&a, &sk).unwrap();
        let b = lib.register(&b, &sk).unwrap();
        (sk, lib, a, b)
    }

    #[test]
    fn clip_fully_resets_after_lifetime() {
        let (_, lib, a, _) = setup();
        let mut state = SequencerState::default();
        let mut samples = Vec::new();
        for _ in 0..11 {
            let (next, d) = advance(&lib, state, Some(a), 0.0).unwrap();
            samples.push(d);
            state = next;
        }
        // Ticks 1..=10 belong to the clip (5 + 2 + 3).
        assert!(!samples[7].is_zero());
        assert!(!samples[9].is_zero());
        assert_eq!(state, SequencerState::Idle { last: Some(a) });
        // Tick 11 contributes nothing.
        assert!(samples[10].is_empty());
    }

    #[test]
    fn reset_only_clip_lasts_its_reset_ticks() {
        let (sk, mut lib, _, _) = setup();
        let def = ClipBuilder::new("settle").reset_keyframe(3).build().unwrap();
        assert_eq!(def.lifetime(), 3);
        let id = lib.register(&def, &sk).unwrap();
        let mut state = SequencerState::default();
        let mut ticks = 0;
        while ticks < 10 {
            let (next, _) = advance(&lib, state, Some(id), 0.0).unwrap();
            state = next;
            ticks += 1;
            if state == (SequencerState::Idle { last: Some(id) }) {
                break;
            }
        }
        assert_eq!(ticks, def.lifetime());

        let instant = ClipBuilder::new("instant").reset_keyframe(0).build().unwrap();
        let id = lib.register(&instant, &sk).unwrap();
        let (next, d) = advance(&lib, SequencerState::default(), Some(id), 0.0).unwrap();
        assert_eq!(next, SequencerState::Idle { last: Some(id) });
        assert!(d.is_empty());
    }

    #[test]
    fn completed_clip_does_not_restart_while_still_requested() {
        let (_, lib, a, _) = setup();
        let state = SequencerState::Idle { last: Some(a) };
        let (next, d) = advance(&lib, state, Some(a), 0.0).unwrap();
        assert_eq!(next, state);
        assert!(d.is_empty());
        // Clearing the request and asking again restarts it.
        let (cleared, _) = advance(&lib, next, None, 0.0).unwrap();
        let (playing, _) = advance(&lib, cleared, Some(a), 0.0).unwrap();
        assert_eq!(
            playing,
            SequencerState::PlayingClip {
                clip: a,
                segment: 0,
                tick: 1
            }
        );
    }

    #[test]
    fn switching_clips_discards_position() {
        let (_, lib, a, b) = setup();
        let state = SequencerState::PlayingClip {
            clip: a,
            segment: 1,
            tick: 2,
        };
        let switched = state.set_animation(b);
        assert_eq!(
            switched,
            SequencerState::PlayingClip {
                clip: b,
                segment: 0,
                tick: 0
            }
        );
        assert_eq!(state.set_animation(a), state);

        let (next, d) = advance(&lib, state, Some(b), 0.0).unwrap();
        assert_eq!(
            next,
            SequencerState::PlayingClip {
                clip: b,
                segment: 0,
                tick: 1
            }
        );
        // Sampled at tick 0 of "b": nothing of "a" remains.
        assert!(d.is_zero());
    }

    #[test]
    fn interpolation_is_exact_at_segment_ends() {
        let v0 = [NodeDelta {
            node: NodeId(1),
            rotation: [0.25, -1.0, 0.0],
            translation: [0.0, 3.0, 0.0],
        }];
        let v1 = [NodeDelta {
            node: NodeId(1),
            rotation: [1.25, 1.0, 0.5],
            translation: [0.0, -1.0, 0.0],
        }];
        let d = 5u32;
        for k in 0..=d {
            let out = lerp_segment(&v0, &v1, k as f32 / d as f32);
            let f = k as f32 / d as f32;
            let expect = 0.25 + (1.25 - 0.25) * f;
            assert!((out[0].rotation[0] - expect).abs() < 1e-6);
        }
        assert_eq!(lerp_segment(&v0, &v1, 0.0)[0], v0[0]);
        assert_eq!(lerp_segment(&v0, &v1, 1.0)[0], v1[0]);
    }

    #[test]
    fn second_segment_blends_from_first_targets() {
        let (sk, lib, a, _) = setup();
        let jaw = sk.find("jaw").unwrap();
        let body = sk.find("body").unwrap();
        let at = |segment, tick| {
            SequencerState::PlayingClip {
                clip: a,
                segment,
                tick,
            }
            .sample(&lib, 0.0)
            .unwrap()
        };
        // Start of segment 1 equals the end of segment 0.
        let s = at(1, 0);
        assert_eq!(s.get(jaw).unwrap().rotation[0], 1.0);
        assert_eq!(s.get(body).unwrap().translation[2], 0.0);
        let s = at(1, 1);
        assert!((s.get(jaw).unwrap().rotation[0] - 0.75).abs() < 1e-6);
        assert!((s.get(body).unwrap().translation[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn partial_tick_moves_within_segment() {
        let (sk, lib, a, _) = setup();
        let jaw = sk.find("jaw").unwrap();
        let state = SequencerState::PlayingClip {
            clip: a,
            segment: 0,
            tick: 2,
        };
        let d = state.sample(&lib, 0.5).unwrap();
        assert!((d.get(jaw).unwrap().rotation[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn unknown_clip_is_an_error() {
        let (_, lib, _, _) = setup();
        let err = advance(&lib, SequencerState::default(), Some(ClipId(42)), 0.0).unwrap_err();
        assert!(matches!(err, AnimError::UnknownClip(ClipId(42))));
    }

    #[test]
    fn hold_segment_keeps_previous_values() {
        let def = RigDefinition::new("r").with_node(NodeDef::new("root", None));
        let sk = Skeleton::from_definition(&def).unwrap();
        let mut lib = ClipLibrary::new();
        let clip = ClipBuilder::new("hold")
            .start_keyframe(2)
            .rotate_by("root", 2.0, 0.0, 0.0)
            .end_keyframe()
            .static_keyframe(3)
            .reset_keyframe(2)
            .build()
            .unwrap();
        let id = lib.register(&clip, &sk).unwrap();
        let mut state = SequencerState::default();
        let mut values = Vec::new();
        for _ in 0..8 {
            let (next, d) = advance(&lib, state, Some(id), 0.0).unwrap();
            values.push(d.deltas.first().map(|d| d.rotation[0]).unwrap_or(0.0));
            state = next;
        }
        assert_eq!(values, vec![0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 1.0, 0.0]);
    }
}
