use critter_creatures::feral_ratlantean::{self, FeralRatlanteanAnimation};
use critter_rig_core::{AnimInputs, Config, RigDefinition, SequencerState};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn rest_inputs_reproduce_the_authored_pose() {
    let asset = feral_ratlantean::asset(Config::default()).unwrap();
    let mut ctl = asset.spawn();
    let rig = ctl.update(&AnimInputs::default()).unwrap();
    for (node, pose) in rig.skeleton().nodes().iter().zip(rig.poses()) {
        assert_eq!(pose.rotation, node.base_rotation, "{}", node.name);
        assert_eq!(pose.translation, [0.0; 3], "{}", node.name);
    }
}

#[test]
fn nose_pulses_with_idle_time() {
    let asset = feral_ratlantean::asset(Config::default()).unwrap();
    let mut ctl = asset.spawn();
    let nose = ctl.rig().handle("nose").unwrap();
    let t = std::f32::consts::FRAC_PI_2 / 0.75;
    let rig = ctl
        .update(&AnimInputs {
            idle_time: t,
            ..AnimInputs::default()
        })
        .unwrap();
    approx(rig.pose(nose).scale[0], 1.0, 1e-6);
}

#[test]
fn every_action_plays_out_and_resets() {
    let asset = feral_ratlantean::asset(Config::default()).unwrap();
    for anim in FeralRatlanteanAnimation::ALL {
        let id = anim.id(&asset).unwrap();
        let lifetime = anim.clip().unwrap().lifetime();
        let mut ctl = asset.spawn();
        let inputs = AnimInputs {
            clip: Some(id),
            ..AnimInputs::default()
        };
        let mut moved = false;
        for _ in 0..lifetime {
            let rig = ctl.update(&inputs).unwrap();
            moved |= rig
                .skeleton()
                .nodes()
                .iter()
                .zip(rig.poses())
                .any(|(n, p)| p.rotation != n.base_rotation);
        }
        assert!(moved, "{} never moved the rig", anim.clip_name());
        assert_eq!(ctl.state(), SequencerState::Idle { last: Some(id) });

        let rig = ctl.update(&inputs).unwrap();
        for (node, pose) in rig.skeleton().nodes().iter().zip(rig.poses()) {
            assert_eq!(pose.rotation, node.base_rotation, "{}: {}", anim.clip_name(), node.name);
            assert_eq!(pose.translation, [0.0; 3], "{}: {}", anim.clip_name(), node.name);
        }
    }
}

#[test]
fn bite_turns_head_to_absolute_yaw() {
    let asset = feral_ratlantean::asset(Config::default()).unwrap();
    let bite = FeralRatlanteanAnimation::Bite.id(&asset).unwrap();
    let mut ctl = asset.spawn();
    let head = ctl.rig().handle("head").unwrap();
    let inputs = AnimInputs {
        clip: Some(bite),
        ..AnimInputs::default()
    };
    // Tick 6 opens the second segment, i.e. the end of the first.
    for _ in 0..6 {
        ctl.update(&inputs).unwrap();
    }
    approx(ctl.rig().pose(head).rotation[1], 60f32.to_radians(), 1e-5);
}

#[test]
fn walking_moves_legs_in_opposition() {
    let asset = feral_ratlantean::asset(Config::default()).unwrap();
    let mut ctl = asset.spawn();
    let left = ctl.rig().handle("front_left_leg").unwrap();
    let right = ctl.rig().handle("front_right_leg").unwrap();
    let base = ctl.rig().skeleton().node(left).base_rotation;
    let rig = ctl
        .update(&AnimInputs {
            limb_swing: 3.0,
            limb_swing_amount: 1.0,
            ..AnimInputs::default()
        })
        .unwrap();
    let dl = rig.pose(left).rotation[1] - base[1];
    let dr = rig.pose(right).rotation[1] - base[1];
    approx(dl, -dr, 1e-6);
    assert!(dl.abs() > 0.0);
}

#[test]
fn rig_table_round_trips_through_json() {
    let def = feral_ratlantean::rig_definition();
    let json = serde_json::to_string_pretty(&def).unwrap();
    let back: RigDefinition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, def);
    let parsed = critter_rig_core::parse_rig_json(&json).unwrap();
    assert_eq!(parsed.nodes.len(), 35);
}
