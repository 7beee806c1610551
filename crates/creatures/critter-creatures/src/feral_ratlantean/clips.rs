//! Bite, sniff and slash actions. Rotations are authored in degrees.

use critter_rig_core::{ClipBuilder, ClipDef, ClipError};

/// Discrete actions the entity can request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeralRatlanteanAnimation {
    Bite,
    Sniff,
    Slash,
}

impl FeralRatlanteanAnimation {
    pub const ALL: [FeralRatlanteanAnimation; 3] = [Self::Bite, Self::Sniff, Self::Slash];

    pub fn clip_name(self) -> &'static str {
        match self {
            Self::Bite => "bite",
            Self::Sniff => "sniff",
            Self::Slash => "slash",
        }
    }

    pub fn clip(self) -> Result<ClipDef, ClipError> {
        match self {
            Self::Bite => bite(),
            Self::Sniff => sniff(),
            Self::Slash => slash(),
        }
    }
}

pub fn clips() -> Result<Vec<ClipDef>, ClipError> {
    FeralRatlanteanAnimation::ALL.iter().map(|a| a.clip()).collect()
}

fn bite() -> Result<ClipDef, ClipError> {
    ClipBuilder::new("bite")
        .degrees()
        .start_keyframe(5)
        .rotate_to("lower_body", 0.0, 10.0, 0.0)
        .rotate_to("mid_body", 0.0, 10.0, 0.0)
        .rotate_to("front_body", 0.0, -30.0, 0.0)
        .rotate_to("neck", 0.0, -30.0, 0.0)
        .rotate_to("head", 0.0, 60.0, 0.0)
        .rotate_to("front_right_foot", 20.0, 0.0, 0.0)
        .rotate_to("front_left_foot", 20.0, 0.0, 0.0)
        .move_by("front_right_leg", 0.0, 1.0, 0.0)
        .move_by("front_left_leg", 0.0, 1.0, 0.0)
        .move_by("lower_body", 0.0, 0.0, 2.0)
        .end_keyframe()
        .start_keyframe(5)
        .move_by("lower_body", 0.0, 0.0, -4.0)
        .rotate_to("neck", -5.0, -5.0, 0.0)
        .rotate_to("head", -30.0, 5.0, 0.0)
        .rotate_to("mouth", 40.0, 5.0, 0.0)
        .end_keyframe()
        .start_keyframe(2)
        .move_by("lower_body", 0.0, 0.0, -1.0)
        .rotate_to("neck", -5.0, -5.0, 0.0)
        .rotate_to("head", -20.0, 5.0, 0.0)
        .rotate_to("mouth", -10.0, 5.0, 0.0)
        .end_keyframe()
        .reset_keyframe(3)
        .build()
}

/// Reared up on the hind legs with the forepaws tucked.
fn rear_up(b: ClipBuilder, body_roll: f32) -> ClipBuilder {
    b.rotate_by("lower_body", -40.0, 0.0, 0.0)
        .rotate_by("mid_body", -15.0, 0.0, 0.0)
        .rotate_by("front_body", -5.0, 0.0, body_roll)
        .rotate_by("back_left_thigh", 40.0, 0.0, 0.0)
        .rotate_by("back_right_thigh", 40.0, 0.0, 0.0)
        .rotate_to("tail1", 20.0, 0.0, 0.0)
        .move_by("lower_body", 0.0, -3.0, -1.0)
}

fn sniff() -> Result<ClipDef, ClipError> {
    let mut b = ClipBuilder::new("sniff").degrees();
    // (duration, torso roll, head pitch): the head bobs while the torso rocks.
    let beats = [
        (5, -5.0, 10.0),
        (2, 5.0, -20.0),
        (2, -5.0, 20.0),
        (2, 5.0, -20.0),
        (2, -5.0, 20.0),
        (2, 5.0, -20.0),
    ];
    for (duration, roll, pitch) in beats {
        b = rear_up(b.start_keyframe(duration), roll)
            .rotate_to("front_left_foot", 150.0, 0.0, 0.0)
            .rotate_to("front_right_foot", 150.0, 0.0, 0.0)
            .rotate_to("head", pitch, 0.0, 0.0)
            .end_keyframe();
    }
    b.reset_keyframe(5).build()
}

fn slash() -> Result<ClipDef, ClipError> {
    let b = ClipBuilder::new("slash").degrees();

    // Left paw winds up, then swipes across.
    let b = rear_up(b.start_keyframe(5), -25.0)
        .rotate_to("front_left_leg", -5.0, 0.0, -75.0)
        .rotate_to("front_left_heel", -30.0, 0.0, 0.0)
        .rotate_to("front_right_leg", 50.0, 0.0, 15.0)
        .rotate_by("front_left_foot", -10.0, -45.0, 45.0)
        .rotate_to("front_right_foot", 150.0, 0.0, 0.0)
        .rotate_to("head", 60.0, 0.0, 10.0)
        .rotate_to("mouth", 30.0, 0.0, 0.0)
        .end_keyframe();
    let b = rear_up(b.start_keyframe(3), 25.0)
        .rotate_to("front_left_leg", -5.0, 0.0, 45.0)
        .rotate_to("front_left_heel", -30.0, 0.0, 0.0)
        .rotate_to("front_right_leg", 50.0, 0.0, 15.0)
        .rotate_by("front_left_foot", -10.0, -45.0, 45.0)
        .rotate_to("front_right_foot", 150.0, 0.0, 0.0)
        .rotate_to("head", 60.0, 0.0, -10.0)
        .rotate_to("mouth", 30.0, 0.0, 0.0)
        .end_keyframe();

    // Right paw mirrors it.
    let b = rear_up(b.start_keyframe(5), 25.0)
        .rotate_to("front_right_leg", -5.0, 0.0, 75.0)
        .rotate_to("front_right_heel", -30.0, 0.0, 0.0)
        .rotate_to("front_left_leg", 50.0, 0.0, -15.0)
        .rotate_by("front_right_foot", -10.0, 45.0, -45.0)
        .rotate_to("front_left_foot", 150.0, 0.0, 0.0)
        .rotate_to("head", 30.0, 0.0, -10.0)
        .rotate_to("mouth", 60.0, 0.0, 0.0)
        .end_keyframe();
    let b = rear_up(b.start_keyframe(3), -25.0)
        .rotate_to("front_right_leg", -5.0, 0.0, -45.0)
        .rotate_to("front_right_heel", -30.0, 0.0, 0.0)
        .rotate_to("front_left_leg", 50.0, 0.0, -15.0)
        .rotate_by("front_right_foot", -10.0, 45.0, -45.0)
        .rotate_to("front_left_foot", 150.0, 0.0, 0.0)
        .rotate_to("head", 60.0, 0.0, 10.0)
        .rotate_to("mouth", 30.0, 0.0, 0.0)
        .end_keyframe();

    b.reset_keyframe(9).build()
}
