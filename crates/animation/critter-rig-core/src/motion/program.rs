//! Data-driven motion programs.
//!
//! A `MotionProgram` lists generator calls by node name; it is compiled once
//! against a skeleton into `CompiledMotion`, which the controller runs every
//! tick after the rig reset.

use serde::{Deserialize, Serialize};

use crate::config::FaceTargetLimits;
use crate::error::RigError;
use crate::ids::NodeId;
use crate::inputs::AnimInputs;
use crate::motion::functions::{self, Axis, Oscillator};
use crate::rig::Rig;
use crate::skeleton::Skeleton;

/// Which entity clock drives a step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Slow age-based clock at full amount.
    #[default]
    Idle,
    /// Limb-swing clock scaled by locomotion magnitude.
    Locomotion,
}

impl Phase {
    /// (time, amount) pair for this phase.
    #[inline]
    pub fn resolve(self, inputs: &AnimInputs) -> (f32, f32) {
        match self {
            Phase::Idle => (inputs.idle_time, 1.0),
            Phase::Locomotion => (inputs.limb_swing, inputs.limb_swing_amount),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OscillateStep {
    pub node: String,
    #[serde(default)]
    pub phase: Phase,
    #[serde(flatten)]
    pub osc: Oscillator,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BobStep {
    pub node: String,
    #[serde(default)]
    pub phase: Phase,
    pub speed: f32,
    pub degree: f32,
    #[serde(default)]
    pub bounce: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainStep {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub phase: Phase,
    pub speed: f32,
    pub degree: f32,
    #[serde(default)]
    pub root_offset: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceTargetStep {
    pub nodes: Vec<String>,
    pub divisor: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulseStep {
    pub node: String,
    #[serde(default)]
    pub phase: Phase,
    pub base: f32,
    pub speed: f32,
    pub degree: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionStep {
    Bob(BobStep),
    Walk(OscillateStep),
    Swing(OscillateStep),
    Flap(OscillateStep),
    ChainSwing(ChainStep),
    ChainWave(ChainStep),
    ChainFlap(ChainStep),
    FaceTarget(FaceTargetStep),
    PulseScale(PulseStep),
}

/// Ordered list of generator calls for one creature type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionProgram {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<MotionStep>,
}

fn owned(nodes: &[&str]) -> Vec<String> {
    nodes.iter().map(|s| s.to_string()).collect()
}

impl MotionProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn bob(mut self, node: &str, phase: Phase, speed: f32, degree: f32, bounce: bool) -> Self {
        self.steps.push(MotionStep::Bob(BobStep {
            node: node.to_string(),
            phase,
            speed,
            degree,
            bounce,
        }));
        self
    }

    pub fn walk(mut self, node: &str, phase: Phase, osc: Oscillator) -> Self {
        self.steps.push(MotionStep::Walk(OscillateStep {
            node: node.to_string(),
            phase,
            osc,
        }));
        self
    }

    pub fn swing(mut self, node: &str, phase: Phase, osc: Oscillator) -> Self {
        self.steps.push(MotionStep::Swing(OscillateStep {
            node: node.to_string(),
            phase,
            osc,
        }));
        self
    }

    pub fn flap(mut self, node: &str, phase: Phase, osc: Oscillator) -> Self {
        self.steps.push(MotionStep::Flap(OscillateStep {
            node: node.to_string(),
            phase,
            osc,
        }));
        self
    }

    pub fn chain_swing(
        mut self,
        nodes: &[&str],
        phase: Phase,
        speed: f32,
        degree: f32,
        root_offset: f32,
    ) -> Self {
        self.steps.push(MotionStep::ChainSwing(ChainStep {
            nodes: owned(nodes),
            phase,
            speed,
            degree,
            root_offset,
        }));
        self
    }

    pub fn chain_wave(
        mut self,
        nodes: &[&str],
        phase: Phase,
        speed: f32,
        degree: f32,
        root_offset: f32,
    ) -> Self {
        self.steps.push(MotionStep::ChainWave(ChainStep {
            nodes: owned(nodes),
            phase,
            speed,
            degree,
            root_offset,
        }));
        self
    }

    pub fn chain_flap(
        mut self,
        nodes: &[&str],
        phase: Phase,
        speed: f32,
        degree: f32,
        root_offset: f32,
    ) -> Self {
        self.steps.push(MotionStep::ChainFlap(ChainStep {
            nodes: owned(nodes),
            phase,
            speed,
            degree,
            root_offset,
        }));
        self
    }

    pub fn face_target(mut self, nodes: &[&str], divisor: f32) -> Self {
        self.steps.push(MotionStep::FaceTarget(FaceTargetStep {
            nodes: owned(nodes),
            divisor,
        }));
        self
    }

    pub fn pulse_scale(mut self, node: &str, phase: Phase, base: f32, speed: f32, degree: f32) -> Self {
        self.steps.push(MotionStep::PulseScale(PulseStep {
            node: node.to_string(),
            phase,
            base,
            speed,
            degree,
        }));
        self
    }

    /// Resolve node names against `skeleton`. Unknown names are fatal here.
    pub fn compile(&self, skeleton: &Skeleton) -> Result<CompiledMotion, RigError> {
        let mut steps = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            steps.push(compile_step(step, skeleton)?);
        }
        Ok(CompiledMotion {
            name: self.name.clone(),
            steps,
        })
    }
}

fn check_finite(node: &str, values: &[f32]) -> Result<(), RigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RigError::NonFinite {
            node: node.to_string(),
            field: "motion parameter",
        })
    }
}

fn resolve_all(skeleton: &Skeleton, nodes: &[String]) -> Result<Vec<NodeId>, RigError> {
    nodes.iter().map(|n| skeleton.resolve(n)).collect()
}

fn compile_step(step: &MotionStep, skeleton: &Skeleton) -> Result<CompiledStep, RigError> {
    let oscillate = |s: &OscillateStep, axis: Axis| -> Result<CompiledStep, RigError> {
        check_finite(&s.node, &[s.osc.speed, s.osc.degree, s.osc.offset])?;
        Ok(CompiledStep::Oscillate {
            node: skeleton.resolve(&s.node)?,
            axis,
            phase: s.phase,
            osc: s.osc,
        })
    };
    let chain = |s: &ChainStep, axis: Axis| -> Result<CompiledStep, RigError> {
        let label = s.nodes.first().map(String::as_str).unwrap_or("<empty chain>");
        check_finite(label, &[s.speed, s.degree, s.root_offset])?;
        Ok(CompiledStep::Chain {
            nodes: resolve_all(skeleton, &s.nodes)?,
            axis,
            phase: s.phase,
            osc: Oscillator::new(s.speed, s.degree),
            root_offset: s.root_offset,
        })
    };

    match step {
        MotionStep::Bob(s) => {
            check_finite(&s.node, &[s.speed, s.degree])?;
            Ok(CompiledStep::Bob {
                node: skeleton.resolve(&s.node)?,
                phase: s.phase,
                speed: s.speed,
                degree: s.degree,
                bounce: s.bounce,
            })
        }
        MotionStep::Walk(s) => oscillate(s, Axis::X),
        MotionStep::Swing(s) => oscillate(s, Axis::Y),
        MotionStep::Flap(s) => oscillate(s, Axis::Z),
        MotionStep::ChainWave(s) => chain(s, Axis::X),
        MotionStep::ChainSwing(s) => chain(s, Axis::Y),
        MotionStep::ChainFlap(s) => chain(s, Axis::Z),
        MotionStep::FaceTarget(s) => {
            let label = s.nodes.first().map(String::as_str).unwrap_or("<empty chain>");
            check_finite(label, &[s.divisor])?;
            Ok(CompiledStep::FaceTarget {
                nodes: resolve_all(skeleton, &s.nodes)?,
                divisor: s.divisor,
            })
        }
        MotionStep::PulseScale(s) => {
            check_finite(&s.node, &[s.base, s.speed, s.degree])?;
            Ok(CompiledStep::Pulse {
                node: skeleton.resolve(&s.node)?,
                phase: s.phase,
                base: s.base,
                speed: s.speed,
                degree: s.degree,
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum CompiledStep {
    Bob {
        node: NodeId,
        phase: Phase,
        speed: f32,
        degree: f32,
        bounce: bool,
    },
    Oscillate {
        node: NodeId,
        axis: Axis,
        phase: Phase,
        osc: Oscillator,
    },
    Chain {
        nodes: Vec<NodeId>,
        axis: Axis,
        phase: Phase,
        osc: Oscillator,
        root_offset: f32,
    },
    FaceTarget {
        nodes: Vec<NodeId>,
        divisor: f32,
    },
    Pulse {
        node: NodeId,
        phase: Phase,
        base: f32,
        speed: f32,
        degree: f32,
    },
}

/// A motion program bound to node handles of one skeleton.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledMotion {
    name: String,
    steps: Vec<CompiledStep>,
}

impl CompiledMotion {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in authored order on top of the rig's current pose.
    pub fn apply(&self, rig: &mut Rig, inputs: &AnimInputs, limits: &FaceTargetLimits) {
        for step in &self.steps {
            match step {
                CompiledStep::Bob {
                    node,
                    phase,
                    speed,
                    degree,
                    bounce,
                } => {
                    let (time, amount) = phase.resolve(inputs);
                    functions::bob(rig, *node, *speed, *degree, *bounce, time, amount);
                }
                CompiledStep::Oscillate {
                    node,
                    axis,
                    phase,
                    osc,
                } => {
                    let (time, amount) = phase.resolve(inputs);
                    functions::oscillate(rig, *node, *axis, *osc, time, amount);
                }
                CompiledStep::Chain {
                    nodes,
                    axis,
                    phase,
                    osc,
                    root_offset,
                } => {
                    let (time, amount) = phase.resolve(inputs);
                    functions::chain(rig, nodes, *axis, *osc, *root_offset, time, amount);
                }
                CompiledStep::FaceTarget { nodes, divisor } => {
                    functions::face_target(
                        rig,
                        inputs.head_yaw,
                        inputs.head_pitch,
                        *divisor,
                        nodes,
                        limits,
                    );
                }
                CompiledStep::Pulse {
                    node,
                    phase,
                    base,
                    speed,
                    degree,
                } => {
                    let (time, _) = phase.resolve(inputs);
                    functions::pulse_scale(rig, *node, *base, *speed, *degree, time);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{NodeDef, RigDefinition};
    use std::sync::Arc;

    fn skeleton() -> Skeleton {
        let def = RigDefinition::new("lizard")
            .with_node(NodeDef::new("body", None))
            .with_node(NodeDef::new("leg", Some("body")))
            .with_node(NodeDef::new("neck", Some("body")))
            .with_node(NodeDef::new("head", Some("neck")));
        Skeleton::from_definition(&def).unwrap()
    }

    #[test]
    fn compile_rejects_unknown_nodes() {
        let sk = skeleton();
        let prog = MotionProgram::new("p").walk("wing", Phase::Idle, Oscillator::new(1.0, 1.0));
        assert_eq!(
            prog.compile(&sk).unwrap_err(),
            RigError::UnknownNode("wing".into())
        );
        let prog = MotionProgram::new("p").face_target(&["neck", "jaw"], 2.0);
        assert!(prog.compile(&sk).is_err());
    }

    #[test]
    fn compile_rejects_non_finite_parameters() {
        let sk = skeleton();
        let prog = MotionProgram::new("p").bob("body", Phase::Idle, f32::NAN, 1.0, false);
        assert!(matches!(
            prog.compile(&sk),
            Err(RigError::NonFinite { .. })
        ));
    }

    #[test]
    fn locomotion_steps_scale_with_amount() {
        let sk = Arc::new(skeleton());
        let prog = MotionProgram::new("p")
            .walk("leg", Phase::Locomotion, Oscillator::new(1.0, 0.5))
            .compile(&sk)
            .unwrap();
        let mut rig = Rig::new(sk.clone());
        let leg = rig.handle("leg").unwrap();
        let still = AnimInputs {
            limb_swing: std::f32::consts::FRAC_PI_2,
            limb_swing_amount: 0.0,
            ..AnimInputs::default()
        };
        prog.apply(&mut rig, &still, &FaceTargetLimits::default());
        assert_eq!(rig.pose(leg).rotation, [0.0; 3]);

        let moving = AnimInputs {
            limb_swing_amount: 1.0,
            ..still
        };
        prog.apply(&mut rig, &moving, &FaceTargetLimits::default());
        assert!((rig.pose(leg).rotation[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn face_target_reads_head_angles() {
        let sk = Arc::new(skeleton());
        let prog = MotionProgram::new("p")
            .face_target(&["neck", "head"], 2.0)
            .compile(&sk)
            .unwrap();
        let mut rig = Rig::new(sk);
        let inputs = AnimInputs {
            head_yaw: 40.0,
            ..AnimInputs::default()
        };
        prog.apply(&mut rig, &inputs, &FaceTargetLimits::default());
        let head = rig.handle("head").unwrap();
        let neck = rig.handle("neck").unwrap();
        let each = 40f32.to_radians() / 4.0;
        assert!((rig.pose(head).rotation[1] - each).abs() < 1e-6);
        assert!((rig.pose(neck).rotation[1] - each).abs() < 1e-6);
    }

    #[test]
    fn program_round_trips_through_json() {
        let prog = MotionProgram::new("p")
            .bob("body", Phase::Idle, 0.3, 0.15, false)
            .swing("leg", Phase::Locomotion, Oscillator::new(0.4, -0.3).inverted(true).offset(1.5))
            .chain_swing(&["neck", "head"], Phase::Idle, 0.3, 0.05, 1.0);
        let json = serde_json::to_string(&prog).unwrap();
        assert!(json.contains("\"kind\":\"swing\""));
        let back: MotionProgram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prog);
    }
}
