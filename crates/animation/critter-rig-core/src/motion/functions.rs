//! Oscillator-style pose generators.
//!
//! Every function here adds to whatever the rig already holds this tick; none
//! of them replace a value (scale pulses multiply). They must run after
//! `Rig::reset_to_default_pose` within the same tick.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::FaceTargetLimits;
use crate::ids::NodeId;
use crate::rig::Rig;

/// Rotation axis a generator writes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn vector(self, v: f32) -> [f32; 3] {
        match self {
            Axis::X => [v, 0.0, 0.0],
            Axis::Y => [0.0, v, 0.0],
            Axis::Z => [0.0, 0.0, v],
        }
    }
}

/// Tunables of a single sinusoid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    /// Phase advance per unit of time.
    pub speed: f32,
    /// Amplitude in radians.
    pub degree: f32,
    /// Flip the sign (mirrored limb).
    #[serde(default)]
    pub invert: bool,
    /// Phase offset in radians.
    #[serde(default)]
    pub offset: f32,
}

impl Oscillator {
    pub const fn new(speed: f32, degree: f32) -> Self {
        Self {
            speed,
            degree,
            invert: false,
            offset: 0.0,
        }
    }

    pub const fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub const fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    /// `±degree * amount * (sin(time * speed + offset) - sin(offset))`.
    ///
    /// Anchored at the phase offset so every oscillator is exactly zero at
    /// time 0, whatever its offset.
    #[inline]
    pub fn sample(&self, time: f32, amount: f32) -> f32 {
        let wave = (time * self.speed + self.offset).sin() - self.offset.sin();
        let v = wave * self.degree * amount;
        if self.invert {
            -v
        } else {
            v
        }
    }
}

/// Oscillate around an arbitrary axis.
pub fn oscillate(
    rig: &mut Rig,
    node: NodeId,
    axis: Axis,
    osc: Oscillator,
    time: f32,
    amount: f32,
) {
    let v = osc.sample(time, amount);
    rig.add_rotation(node, axis.vector(v));
}

/// Pitch (X) oscillation; alternating limb swing.
pub fn walk(rig: &mut Rig, node: NodeId, osc: Oscillator, time: f32, amount: f32) {
    oscillate(rig, node, Axis::X, osc, time, amount);
}

/// Yaw (Y) oscillation; lateral sway.
pub fn swing(rig: &mut Rig, node: NodeId, osc: Oscillator, time: f32, amount: f32) {
    oscillate(rig, node, Axis::Y, osc, time, amount);
}

/// Roll (Z) oscillation; thin flexible parts.
pub fn flap(rig: &mut Rig, node: NodeId, osc: Oscillator, time: f32, amount: f32) {
    oscillate(rig, node, Axis::Z, osc, time, amount);
}

/// Vertical pivot oscillation. With `bounce` the node only ever dips.
pub fn bob(
    rig: &mut Rig,
    node: NodeId,
    speed: f32,
    degree: f32,
    bounce: bool,
    time: f32,
    amount: f32,
) {
    let mut v = (time * speed).sin() * amount * degree;
    if bounce {
        v = -v.abs();
    }
    rig.add_translation(node, [0.0, v, 0.0]);
}

/// Phase step between neighbouring links of a chain.
#[inline]
pub fn chain_offset(root_offset: f32, len: usize) -> f32 {
    if len == 0 {
        return 0.0;
    }
    root_offset * PI / (2.0 * len as f32)
}

/// Traveling wave along an ordered chain: link `i` lags by `i * chain_offset`.
pub fn chain(
    rig: &mut Rig,
    nodes: &[NodeId],
    axis: Axis,
    osc: Oscillator,
    root_offset: f32,
    time: f32,
    amount: f32,
) {
    let step = chain_offset(root_offset, nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let link = osc.offset(osc.offset + step * i as f32);
        oscillate(rig, *node, axis, link, time, amount);
    }
}

pub fn chain_swing(
    rig: &mut Rig,
    nodes: &[NodeId],
    speed: f32,
    degree: f32,
    root_offset: f32,
    time: f32,
    amount: f32,
) {
    let osc = Oscillator::new(speed, degree);
    chain(rig, nodes, Axis::Y, osc, root_offset, time, amount);
}

pub fn chain_wave(
    rig: &mut Rig,
    nodes: &[NodeId],
    speed: f32,
    degree: f32,
    root_offset: f32,
    time: f32,
    amount: f32,
) {
    let osc = Oscillator::new(speed, degree);
    chain(rig, nodes, Axis::X, osc, root_offset, time, amount);
}

pub fn chain_flap(
    rig: &mut Rig,
    nodes: &[NodeId],
    speed: f32,
    degree: f32,
    root_offset: f32,
    time: f32,
    amount: f32,
) {
    let osc = Oscillator::new(speed, degree);
    chain(rig, nodes, Axis::Z, osc, root_offset, time, amount);
}

/// Turn a chain (e.g. neck then head) toward a look target given in degrees.
///
/// The angles are clamped to `limits`, divided by `divisor` and split evenly:
/// each of the `n` links receives `angle / (divisor * n)`.
pub fn face_target(
    rig: &mut Rig,
    yaw_degrees: f32,
    pitch_degrees: f32,
    divisor: f32,
    nodes: &[NodeId],
    limits: &FaceTargetLimits,
) {
    if nodes.is_empty() || divisor.is_nan() || divisor <= 0.0 {
        return;
    }
    let yaw = clamp_symmetric(yaw_degrees, limits.max_yaw_degrees);
    let pitch = clamp_symmetric(pitch_degrees, limits.max_pitch_degrees);
    let share = divisor * nodes.len() as f32;
    let yaw_each = yaw.to_radians() / share;
    let pitch_each = pitch.to_radians() / share;
    for node in nodes {
        rig.add_rotation(*node, [pitch_each, yaw_each, 0.0]);
    }
}

/// Limits that are not a finite non-negative bound leave the angle unclamped.
fn clamp_symmetric(v: f32, limit: f32) -> f32 {
    if limit.is_finite() && limit >= 0.0 {
        v.clamp(-limit, limit)
    } else {
        v
    }
}

/// Multiply a node's scale by `base + degree * sin(time * speed)`.
pub fn pulse_scale(rig: &mut Rig, node: NodeId, base: f32, speed: f32, degree: f32, time: f32) {
    let factor = base + (time * speed).sin() * degree;
    let s = rig.pose(node).scale;
    rig.set_scale(node, [s[0] * factor, s[1] * factor, s[2] * factor]);
}
