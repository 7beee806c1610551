//! Idle breathing, gait and look-at for the feral ratlantean.

use critter_rig_core::{MotionProgram, Oscillator, Phase};

use super::rig::{RIG_NAME, TAIL};

const IDLE_SPEED: f32 = 0.3;
const IDLE_DEGREE: f32 = 0.1;
const WALK_SPEED: f32 = 0.4;
const WALK_DEGREE: f32 = 0.3;

fn idle(degree: f32, invert: bool, offset: f32) -> Oscillator {
    Oscillator::new(IDLE_SPEED, degree).inverted(invert).offset(offset)
}

fn gait(degree: f32, invert: bool, offset: f32) -> Oscillator {
    Oscillator::new(WALK_SPEED, degree).inverted(invert).offset(offset)
}

pub fn motion_program() -> MotionProgram {
    use Phase::{Idle, Locomotion};

    let crouch = -IDLE_DEGREE * 1.5;
    let mut p = MotionProgram::new(RIG_NAME).bob("lower_body", Idle, IDLE_SPEED, IDLE_DEGREE * 1.5, false);
    for leg in ["back_left_thigh", "back_right_thigh", "front_left_leg", "front_right_leg"] {
        p = p.bob(leg, Idle, IDLE_SPEED, crouch, false);
    }

    // Breathing shifts weight through every joint.
    p = p
        .walk("back_left_thigh", Idle, idle(-IDLE_DEGREE * 0.25, false, 3.0))
        .walk("back_left_leg", Idle, idle(IDLE_DEGREE * 0.15, false, 3.0))
        .walk("back_left_heel", Idle, idle(IDLE_DEGREE * 0.1, false, 3.0))
        .walk("back_right_thigh", Idle, idle(-IDLE_DEGREE * 0.25, false, 3.0))
        .walk("back_right_leg", Idle, idle(IDLE_DEGREE * 0.15, false, 3.0))
        .walk("back_right_heel", Idle, idle(IDLE_DEGREE * 0.1, false, 3.0))
        .walk("front_left_leg", Idle, idle(IDLE_DEGREE * 0.15, false, 3.0))
        .walk("front_left_heel", Idle, idle(-IDLE_DEGREE * 0.15, false, 3.0))
        .walk("front_right_leg", Idle, idle(IDLE_DEGREE * 0.15, false, 3.0))
        .walk("front_right_heel", Idle, idle(-IDLE_DEGREE * 0.15, false, 3.0))
        .walk("front_right_foot", Idle, idle(IDLE_DEGREE * 0.25, false, 2.0))
        .walk("front_left_foot", Idle, idle(IDLE_DEGREE * 0.25, false, 2.0))
        .walk("front_body", Idle, idle(-IDLE_DEGREE * 0.25, false, 2.0))
        .walk("neck", Idle, idle(IDLE_DEGREE * 0.15, false, 2.0))
        .chain_swing(&TAIL, Idle, IDLE_SPEED, IDLE_DEGREE * 0.5, 1.0);

    // Left and right limbs sway against each other.
    let sway = -IDLE_DEGREE * 0.95;
    p = p
        .swing("back_left_thigh", Idle, idle(sway, true, 1.0))
        .swing("back_right_thigh", Idle, idle(sway, false, 1.0))
        .swing("front_left_leg", Idle, idle(sway, true, 1.0))
        .swing("front_right_leg", Idle, idle(sway, false, 1.0))
        .swing("back_left_foot", Idle, idle(-sway, true, 1.0))
        .swing("back_right_foot", Idle, idle(-sway, false, 1.0))
        .swing("front_left_foot", Idle, idle(-sway, true, 1.0))
        .swing("front_right_foot", Idle, idle(-sway, false, 1.0));

    // Whiskers, nose, jaw and tatters.
    p = p
        .swing("whisker_right", Idle, idle(IDLE_DEGREE, false, 0.0))
        .swing("whisker_left", Idle, idle(IDLE_DEGREE, true, 0.0))
        .flap("whisker_right", Idle, idle(IDLE_DEGREE, false, 1.0))
        .flap("whisker_left", Idle, idle(IDLE_DEGREE, false, 1.0))
        .walk("whisker_right", Idle, idle(IDLE_DEGREE, false, 2.0))
        .walk("whisker_left", Idle, idle(IDLE_DEGREE, false, 2.0))
        .pulse_scale("nose", Idle, 0.9, 0.75, 0.1)
        .walk(
            "mouth",
            Idle,
            Oscillator::new(IDLE_SPEED * 0.75, IDLE_DEGREE).inverted(true).offset(4.0),
        )
        .flap(
            "tatters1",
            Idle,
            Oscillator::new(IDLE_SPEED * 0.25, IDLE_DEGREE).inverted(true).offset(3.0),
        )
        .flap(
            "tatters2",
            Idle,
            Oscillator::new(IDLE_SPEED * 0.25, IDLE_DEGREE).inverted(true).offset(3.0),
        )
        .flap(
            "tatters3",
            Idle,
            Oscillator::new(IDLE_SPEED * 0.5, IDLE_DEGREE).inverted(true).offset(3.0),
        )
        .flap(
            "tatters4",
            Idle,
            Oscillator::new(IDLE_SPEED * 0.5, IDLE_DEGREE).inverted(true).offset(3.0),
        );

    // Gait. Oscillators carry no static weight; neutral angles live in the rest pose.
    p = p
        .bob("lower_body", Locomotion, WALK_SPEED, WALK_DEGREE * 5.0, false)
        .walk("mid_body", Locomotion, gait(WALK_DEGREE, false, 0.0))
        .walk("front_body", Locomotion, gait(WALK_DEGREE * 0.5, false, 1.0))
        .walk("neck", Locomotion, gait(WALK_DEGREE * 0.5, false, 2.0))
        .walk("tail1", Locomotion, gait(WALK_DEGREE, false, -1.0))
        .walk("tail2", Locomotion, gait(WALK_DEGREE * 0.5, false, -2.0))
        .walk("tail3", Locomotion, gait(WALK_DEGREE * 0.5, false, -3.0))
        .walk("tail4", Locomotion, gait(WALK_DEGREE * 0.5, false, -4.0))
        .walk("back_left_thigh", Locomotion, gait(WALK_DEGREE * 2.0, true, 0.0))
        .walk("back_right_thigh", Locomotion, gait(WALK_DEGREE * 2.0, true, 0.0))
        .walk("back_left_leg", Locomotion, gait(WALK_DEGREE * 2.0, true, 0.0))
        .walk("back_right_leg", Locomotion, gait(WALK_DEGREE * 2.0, true, 0.0))
        .walk("back_left_heel", Locomotion, gait(WALK_DEGREE, true, 1.0))
        .walk("back_right_heel", Locomotion, gait(WALK_DEGREE, true, 1.0))
        .walk("back_left_foot", Locomotion, gait(WALK_DEGREE * 6.0, false, 0.7))
        .walk("back_right_foot", Locomotion, gait(WALK_DEGREE * 6.0, false, 0.7))
        .walk("front_left_leg", Locomotion, gait(WALK_DEGREE * 2.0, true, 2.0))
        .walk("front_right_leg", Locomotion, gait(WALK_DEGREE * 2.0, true, 2.0))
        .walk("front_left_heel", Locomotion, gait(WALK_DEGREE * 2.0, true, 2.0))
        .walk("front_right_heel", Locomotion, gait(WALK_DEGREE * 2.0, true, 2.0))
        .walk("front_left_foot", Locomotion, gait(WALK_DEGREE * 4.0, false, 2.6))
        .walk("front_right_foot", Locomotion, gait(WALK_DEGREE * 4.0, false, 2.6))
        .swing("front_left_leg", Locomotion, gait(-WALK_DEGREE, false, 1.5))
        .swing("front_right_leg", Locomotion, gait(-WALK_DEGREE, true, 1.5))
        .swing("back_left_thigh", Locomotion, gait(-WALK_DEGREE * 1.25, false, 0.0))
        .swing("back_right_thigh", Locomotion, gait(-WALK_DEGREE * 1.25, true, 0.0));

    p.face_target(&["neck", "head"], 2.0)
}
