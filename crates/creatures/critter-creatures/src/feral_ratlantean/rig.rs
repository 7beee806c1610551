//! Node table of the feral ratlantean (128x64 texture sheet).

use critter_rig_core::{NodeDef, RigDefinition};

pub const RIG_NAME: &str = "feral_ratlantean";

pub const TAIL: [&str; 4] = ["tail1", "tail2", "tail3", "tail4"];

#[inline]
fn deg(d: f32) -> f32 {
    d.to_radians()
}

fn node(name: &str, parent: Option<&str>) -> NodeDef {
    NodeDef::new(name, parent)
}

/// Full rest-pose rig. Box origins, sizes and texel offsets are carried for
/// the renderer only.
pub fn rig_definition() -> RigDefinition {
    RigDefinition {
        name: RIG_NAME.to_string(),
        texture_size: [128, 64],
        nodes: vec![
            // Torso
            node("lower_body", None)
                .pivot(0.0, 12.3, 4.0)
                .rotation(deg(-5.0), 0.0, 0.0)
                .cuboid([-3.5, -4.0, -1.0], [7, 8, 10], [0, 0]),
            node("mid_body", Some("lower_body"))
                .pivot(0.0, 0.0, -1.0)
                .rotation(deg(10.0), 0.0, 0.0)
                .cuboid([-3.0, -3.0, -7.0], [6, 7, 8], [34, 0]),
            node("front_body", Some("mid_body"))
                .pivot(0.0, 0.0, -6.0)
                .rotation(deg(15.0), 0.0, 0.0)
                .cuboid([-3.5, -3.5, -7.0], [7, 7, 7], [15, 27]),
            // Front legs
            node("front_left_leg", Some("front_body"))
                .pivot(3.5, 2.0, -4.0)
                .rotation(deg(30.0), 0.0, 0.0)
                .cuboid([0.0, -1.0, -1.5], [2, 6, 3], [0, 0]),
            node("front_left_heel", Some("front_left_leg"))
                .pivot(1.0, 4.7, 1.0)
                .rotation(deg(-55.0), 0.0, 0.0)
                .cuboid([-0.5, 0.0, -2.0], [1, 6, 2], [34, 0]),
            node("front_left_foot", Some("front_left_heel"))
                .pivot(0.0, 5.1, -0.7)
                .rotation(deg(5.0), 0.0, 0.0)
                .cuboid([-1.0, 0.0, -5.0], [2, 1, 5], [0, 29]),
            node("front_right_leg", Some("front_body"))
                .pivot(-3.5, 2.0, -4.0)
                .rotation(deg(30.0), 0.0, 0.0)
                .cuboid([-2.0, -1.0, -1.5], [2, 6, 3], [0, 0]),
            node("front_right_heel", Some("front_right_leg"))
                .pivot(-1.0, 4.7, 1.0)
                .rotation(deg(-55.0), 0.0, 0.0)
                .cuboid([-0.5, 0.0, -2.0], [1, 6, 2], [34, 0]),
            node("front_right_foot", Some("front_right_heel"))
                .pivot(0.0, 5.1, -0.7)
                .rotation(deg(5.0), 0.0, 0.0)
                .cuboid([-1.0, 0.0, -5.0], [2, 1, 5], [0, 29]),
            // Neck and head
            node("neck", Some("front_body"))
                .pivot(0.0, -0.5, -7.0)
                .rotation(deg(-15.0), 0.0, 0.0)
                .cuboid([-2.0, -2.5, -4.0], [4, 5, 5], [43, 27]),
            node("head", Some("neck"))
                .pivot(0.0, 0.0, -2.5)
                .rotation(deg(-5.0), 0.0, 0.0)
                .cuboid([-3.0, -2.5, -6.0], [6, 5, 6], [37, 37]),
            node("mouth", Some("head"))
                .pivot(0.0, 1.5, -5.0)
                .cuboid([-1.5, 0.0, -5.7], [3, 1, 5], [13, 41]),
            node("ear_left", Some("head"))
                .pivot(2.5, -2.0, -2.0)
                .rotation(deg(45.0), deg(45.0), 0.0)
                .cuboid([0.0, 0.0, 0.0], [0, 3, 3], [71, -3]),
            node("ear_right", Some("head"))
                .pivot(-2.5, -2.0, -2.0)
                .rotation(deg(45.0), deg(-45.0), 0.0)
                .cuboid([0.0, 0.0, 0.0], [0, 3, 3], [71, -3]),
            node("snout_upper", Some("head"))
                .pivot(0.0, -1.3, -6.0)
                .cuboid([-2.0, 0.0, -5.0], [4, 3, 5], [0, 36]),
            node("nose", Some("snout_upper"))
                .pivot(0.0, 0.5, -4.0)
                .rotation(0.318_697_1, 0.0, 0.0)
                .cuboid([-1.0, -1.0, -2.0], [2, 2, 3], [36, 27]),
            node("teeth", Some("snout_upper"))
                .pivot(0.0, 3.0, 0.0)
                .scale(0.99)
                .cuboid([-2.0, -0.1, -5.0], [4, 2, 5], [24, 43]),
            node("whisker_left", Some("snout_upper"))
                .pivot(2.0, 1.0, -4.0)
                .rotation(0.0, deg(-50.0), 0.0)
                .mirrored()
                .cuboid([0.0, -2.0, 0.0], [4, 4, 0], [63, 0]),
            node("whisker_right", Some("snout_upper"))
                .pivot(-2.0, 1.0, -4.0)
                .rotation(0.0, deg(50.0), 0.0)
                .cuboid([-4.0, -2.0, 0.0], [4, 4, 0], [63, 0]),
            // Tatters hang off the torso and neck.
            node("tatters1", Some("mid_body"))
                .pivot(3.0, -1.0, -3.0)
                .rotation(0.0, 0.0, deg(-15.0))
                .cuboid([0.0, 0.0, -3.0], [0, 9, 6], [63, 0]),
            node("tatters2", Some("mid_body"))
                .pivot(-3.0, -3.0, -6.0)
                .rotation(0.0, 0.0, deg(30.0))
                .cuboid([0.0, 0.0, -3.0], [0, 8, 6], [76, 0]),
            node("tatters3", Some("lower_body"))
                .pivot(3.5, -4.0, 7.0)
                .rotation(0.0, 0.0, -0.910_538_3)
                .cuboid([0.0, 0.0, -3.0], [0, 9, 6], [102, 0]),
            node("tatters4", Some("neck"))
                .pivot(-2.0, -1.0, -1.0)
                .rotation(0.0, 0.0, deg(15.0))
                .cuboid([0.0, 0.0, -3.0], [0, 9, 6], [89, 0]),
            // Hind legs
            node("back_left_thigh", Some("lower_body"))
                .pivot(3.5, 0.0, 5.0)
                .rotation(deg(-45.0), 0.0, 0.0)
                .cuboid([0.0, -1.0, -2.0], [3, 8, 4], [30, 15]),
            node("back_left_leg", Some("back_left_thigh"))
                .pivot(1.2, 7.0, 1.5)
                .rotation(deg(130.0), 0.0, 0.0)
                .cuboid([-1.0, 0.0, 0.0], [2, 6, 2], [0, 18]),
            node("back_left_heel", Some("back_left_leg"))
                .pivot(0.0, 6.0, 0.2)
                .rotation(deg(-115.0), 0.0, 0.0)
                .cuboid([-0.5, 0.0, -2.0], [1, 6, 2], [0, 44]),
            node("back_left_foot", Some("back_left_heel"))
                .pivot(0.0, 5.1, -0.7)
                .rotation(deg(35.0), 0.0, 0.0)
                .mirrored()
                .cuboid([-1.0, 0.0, -5.0], [2, 1, 5], [1, 47]),
            node("back_right_thigh", Some("lower_body"))
                .pivot(-3.5, 0.0, 5.0)
                .rotation(deg(-45.0), 0.0, 0.0)
                .cuboid([-3.0, -1.0, -2.0], [3, 8, 4], [30, 15]),
            node("back_right_leg", Some("back_right_thigh"))
                .pivot(-1.2, 7.0, 1.5)
                .rotation(deg(130.0), 0.0, 0.0)
                .cuboid([-1.0, 0.0, 0.0], [2, 6, 2], [0, 18]),
            node("back_right_heel", Some("back_right_leg"))
                .pivot(0.0, 6.0, 0.2)
                .rotation(deg(-115.0), 0.0, 0.0)
                .cuboid([-0.5, 0.0, -2.0], [1, 6, 2], [0, 44]),
            node("back_right_foot", Some("back_right_heel"))
                .pivot(0.0, 5.1, -0.7)
                .rotation(deg(35.0), 0.0, 0.0)
                .cuboid([-1.0, 0.0, -5.0], [2, 1, 5], [1, 47]),
            // Tail
            node("tail1", Some("lower_body"))
                .pivot(0.0, -1.0, 8.0)
                .rotation(deg(-40.0), 0.0, 0.0)
                .cuboid([-1.5, -1.5, 0.0], [3, 3, 8], [0, 18]),
            node("tail2", Some("tail1"))
                .pivot(0.0, 0.1, 7.5)
                .rotation(deg(15.0), 0.0, 0.0)
                .cuboid([-1.0, -1.5, 0.0], [2, 3, 8], [15, 50]),
            node("tail3", Some("tail2"))
                .pivot(0.0, 0.0, 7.5)
                .rotation(deg(15.0), 0.0, 0.0)
                .scale(0.99)
                .cuboid([-1.0, -1.0, 0.0], [2, 2, 8], [0, 53]),
            node("tail4", Some("tail3"))
                .pivot(0.0, 0.0, 7.5)
                .rotation(deg(15.0), 0.0, 0.0)
                .scale(0.98)
                .cuboid([-1.0, -1.0, 0.0], [2, 2, 8], [0, 53]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_rig_core::Skeleton;

    #[test]
    fn table_builds_a_single_tree() {
        let def = rig_definition();
        assert_eq!(def.nodes.len(), 35);
        let sk = Skeleton::from_definition(&def).unwrap();
        assert_eq!(sk.node(sk.root()).name, "lower_body");
        assert_eq!(sk.texture_size(), [128, 64]);
        for name in TAIL {
            assert!(sk.find(name).is_some(), "{name}");
        }
    }

    #[test]
    fn mirrored_parts_and_scales_survive() {
        let sk = Skeleton::from_definition(&rig_definition()).unwrap();
        let whisker = sk.node(sk.resolve("whisker_left").unwrap());
        assert!(whisker.mirror);
        assert_eq!(sk.node(sk.resolve("tail4").unwrap()).base_scale, [0.98; 3]);
        let ear = sk.node(sk.resolve("ear_left").unwrap());
        assert_eq!(ear.cuboid.as_ref().map(|c| c.texture_offset), Some([71, -3]));
    }
}
