//! Procedural motion: stateless oscillators plus compiled per-creature programs.

pub mod functions;
pub mod program;

pub use functions::{
    bob, chain_flap, chain_swing, chain_wave, face_target, flap, pulse_scale, swing, walk, Axis,
    Oscillator,
};
pub use program::{CompiledMotion, MotionProgram, MotionStep, Phase};
