//! Writing trajectories onto a spawned robot as keyframes.

use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};
use std::path::Path;

use bevy::log::{info, warn};
use bevy::prelude::*;
use nalgebra::Isometry3;
use robostage_core::{AngleUnit, AnimationConfig, ContinuousMode};
use robostage_scene::{JointNode, LocalPose, RestPose, SpawnedRobot};
use robostage_urdf::{JointType, joint_motion};

use crate::error::TrajectoryError;
use crate::track::{AnimationTrack, Keyframe};
use crate::trajectory::{CsvLayout, Trajectory};

// ---------------------------------------------------------------------------
// AnimationReport
// ---------------------------------------------------------------------------

/// Summary of one keying pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationReport {
    pub samples: usize,
    /// Distinct keys written. A value landing on a frame its joint already
    /// holds replaces that key and counts under `overwritten` instead.
    pub keyframes: usize,
    /// Keys replaced because two samples rounded to the same frame.
    pub overwritten: usize,
    /// Joints that received at least one key, in first-keyed order.
    pub animated_joints: Vec<String>,
    /// Joint names absent from the robot, with the number of values
    /// skipped for each.
    pub unknown_joints: BTreeMap<String, usize>,
}

impl AnimationReport {
    pub fn skipped_values(&self) -> usize {
        self.unknown_joints.values().sum()
    }

    pub fn summary(&self) -> String {
        let base = format!(
            "keyed {} samples: {} keyframes on {} joints",
            self.samples,
            self.keyframes,
            self.animated_joints.len()
        );
        if self.unknown_joints.is_empty() {
            return base;
        }
        let names: Vec<&str> = self.unknown_joints.keys().map(String::as_str).collect();
        format!(
            "{base}; skipped {} values for unknown joints {}",
            self.skipped_values(),
            names.join(", ")
        )
    }

    fn note_keyed(&mut self, joint: &str, replaced: bool) {
        if replaced {
            self.overwritten += 1;
        } else {
            self.keyframes += 1;
        }
        if !self.animated_joints.iter().any(|j| j == joint) {
            self.animated_joints.push(joint.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Value conversion
// ---------------------------------------------------------------------------

/// Normalise an angle into `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Convert a raw trajectory value to the joint's native unit (radians or
/// meters), wrapping continuous joints when configured.
pub fn joint_value(joint_type: JointType, raw: f32, config: &AnimationConfig) -> f32 {
    if !joint_type.is_angular() {
        return raw;
    }
    let radians = match config.angle_unit {
        AngleUnit::Radians => raw,
        AngleUnit::Degrees => raw.to_radians(),
    };
    match (joint_type, config.continuous_mode) {
        (JointType::Continuous, ContinuousMode::Wrapped) => wrap_angle(radians),
        _ => radians,
    }
}

// ---------------------------------------------------------------------------
// Keying
// ---------------------------------------------------------------------------

/// Key one joint value. Returns `None` when the robot has no such joint,
/// otherwise whether an existing key on the same frame was replaced.
fn key_joint(
    world: &mut World,
    robot: &SpawnedRobot,
    joint: &str,
    raw: f32,
    (time, frame): (f32, i64),
    config: &AnimationConfig,
) -> Option<bool> {
    let entity = robot.joint_entity(joint)?;
    let node = world.get::<JointNode>(entity)?;
    let (joint_type, axis) = (node.joint_type, node.axis);
    let rest = world
        .get::<RestPose>(entity)
        .map_or_else(Isometry3::identity, |r| r.0);

    let value = joint_value(joint_type, raw, config);
    let key = Keyframe {
        time,
        frame,
        value,
        pose: rest * joint_motion(joint_type, axis, value),
    };

    if let Some(mut track) = world.get_mut::<AnimationTrack>(entity) {
        return Some(track.insert(key));
    }
    let mut track = AnimationTrack::new(joint, joint_type, axis, rest);
    track.insert(key);
    world.entity_mut(entity).insert(track);
    Some(false)
}

fn key_values<'a>(
    world: &mut World,
    robot: &SpawnedRobot,
    values: impl IntoIterator<Item = (&'a str, f32)>,
    at: (f32, i64),
    config: &AnimationConfig,
    report: &mut AnimationReport,
) {
    for (joint, raw) in values {
        match key_joint(world, robot, joint, raw, at, config) {
            Some(replaced) => report.note_keyed(joint, replaced),
            None => *report.unknown_joints.entry(joint.to_string()).or_default() += 1,
        }
    }
}

fn log_report(robot: &SpawnedRobot, report: &AnimationReport) {
    for (joint, count) in &report.unknown_joints {
        warn!(
            "{}: trajectory joint {joint} not in robot, skipped {count} value(s)",
            robot.name
        );
    }
    if report.overwritten > 0 {
        warn!(
            "{}: {} value(s) landed on an already keyed frame and replaced it",
            robot.name, report.overwritten
        );
    }
    info!("{}: {}", robot.name, report.summary());
}

/// Key every sample of `trajectory` onto `robot`.
///
/// Each value becomes a keyframe at `round(time * fps) + frame_offset` on
/// the joint's child node, holding the node's local pose (joint origin
/// followed by the joint motion). Values for joints the robot lacks are
/// skipped and counted in the report.
pub fn animate(
    world: &mut World,
    robot: &SpawnedRobot,
    trajectory: &Trajectory,
    config: &AnimationConfig,
) -> Result<AnimationReport, TrajectoryError> {
    config.validate()?;
    let mut report = AnimationReport::default();
    for sample in trajectory.samples() {
        let at = (sample.time, config.frame_for(sample.time));
        let values = sample.values.iter().map(|(j, v)| (j.as_str(), *v));
        key_values(world, robot, values, at, config, &mut report);
        report.samples += 1;
    }
    log_report(robot, &report);
    Ok(report)
}

/// Key a single pose at `frame`.
pub fn pose_frame(
    world: &mut World,
    robot: &SpawnedRobot,
    frame: i64,
    values: &[(&str, f32)],
    config: &AnimationConfig,
) -> Result<AnimationReport, TrajectoryError> {
    config.validate()?;
    #[allow(clippy::cast_possible_truncation)]
    let time = ((frame - config.frame_offset) as f64 / f64::from(config.fps)) as f32;
    let mut report = AnimationReport {
        samples: 1,
        ..AnimationReport::default()
    };
    key_values(world, robot, values.iter().copied(), (time, frame), config, &mut report);
    log_report(robot, &report);
    Ok(report)
}

/// Load a CSV trajectory and key it onto `robot`.
pub fn animate_from_csv(
    world: &mut World,
    robot: &SpawnedRobot,
    path: &Path,
    layout: &CsvLayout,
    config: &AnimationConfig,
) -> Result<AnimationReport, TrajectoryError> {
    let trajectory = Trajectory::from_csv_path(path, layout, &config.time_column)?;
    animate(world, robot, &trajectory, config)
}

/// Write the sampled pose of every animated joint at `time` into its
/// node's [`LocalPose`]. Returns the number of nodes updated.
pub fn apply_pose_at(world: &mut World, robot: &SpawnedRobot, time: f32) -> usize {
    let mut updated = 0;
    for &entity in robot.joints.values() {
        let Some(pose) = world.get::<AnimationTrack>(entity).and_then(|t| t.sample(time)) else {
            continue;
        };
        if let Some(mut local) = world.get_mut::<LocalPose>(entity) {
            local.0 = pose;
            updated += 1;
        }
    }
    updated
}

/// Remove all keyframes from `robot`.
pub fn clear_animation(world: &mut World, robot: &SpawnedRobot) {
    for &entity in robot.joints.values() {
        if world.get::<AnimationTrack>(entity).is_some() {
            world.entity_mut(entity).remove::<AnimationTrack>();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};
    use robostage_core::ImportConfig;
    use robostage_scene::import_robot_str;

    use super::*;
    use crate::trajectory::JointStateSample;

    const ROBOT: &str = r#"
        <robot name="r">
            <link name="base"/><link name="arm"/><link name="slider"/><link name="wheel"/>
            <link name="cap"/>
            <joint name="joint1" type="revolute">
                <parent link="base"/><child link="arm"/>
                <origin xyz="0 0 1"/><axis xyz="0 0 1"/>
                <limit lower="-3.14" upper="3.14" effort="1" velocity="1"/>
            </joint>
            <joint name="slide" type="prismatic">
                <parent link="arm"/><child link="slider"/>
                <axis xyz="1 0 0"/>
                <limit lower="0" upper="1" effort="1" velocity="1"/>
            </joint>
            <joint name="spin" type="continuous">
                <parent link="slider"/><child link="wheel"/><axis xyz="0 1 0"/>
            </joint>
            <joint name="weld" type="fixed">
                <parent link="wheel"/><child link="cap"/><origin xyz="0 0 0.2"/>
            </joint>
        </robot>
    "#;

    fn robot(world: &mut World) -> SpawnedRobot {
        import_robot_str(world, ROBOT, None, &ImportConfig::default()).unwrap()
    }

    fn track<'w>(world: &'w World, robot: &SpawnedRobot, joint: &str) -> &'w AnimationTrack {
        world
            .get::<AnimationTrack>(robot.joint_entity(joint).unwrap())
            .unwrap()
    }

    #[test]
    fn wrap_angle_range() {
        assert_relative_eq!(wrap_angle(3.0 * PI), PI, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(-FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn degrees_only_convert_angular_joints() {
        let config = AnimationConfig {
            angle_unit: AngleUnit::Degrees,
            ..AnimationConfig::default()
        };
        assert_relative_eq!(joint_value(JointType::Revolute, 90.0, &config), FRAC_PI_2);
        assert_relative_eq!(joint_value(JointType::Prismatic, 0.5, &config), 0.5);
    }

    #[test]
    fn continuous_unwrapped_by_default() {
        let config = AnimationConfig::default();
        assert_relative_eq!(joint_value(JointType::Continuous, 4.0 * PI, &config), 4.0 * PI);
        let wrapped = AnimationConfig {
            continuous_mode: ContinuousMode::Wrapped,
            ..AnimationConfig::default()
        };
        assert_relative_eq!(
            joint_value(JointType::Continuous, 4.0 * PI + 0.1, &wrapped),
            0.1,
            epsilon = 1e-5
        );
        // Revolute joints are never wrapped.
        assert_relative_eq!(joint_value(JointType::Revolute, 4.0 * PI, &wrapped), 4.0 * PI);
    }

    #[test]
    fn quarter_turn_keyed_at_frame() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let trajectory = Trajectory::new(vec![
            JointStateSample::new(0.0).with("joint1", 0.0),
            JointStateSample::new(1.0).with("joint1", 1.5708),
        ])
        .unwrap();
        let report = animate(&mut world, &robot, &trajectory, &AnimationConfig::default()).unwrap();
        assert_eq!(report.keyframes, 2);

        let track = track(&world, &robot, "joint1");
        let start = track.at_frame(0).unwrap().pose;
        let end = track.at_frame(24).unwrap().pose;
        let delta = start.rotation.inverse() * end.rotation;
        let expected = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        assert_relative_eq!(delta.angle_to(&expected), 0.0, epsilon = 1e-4);
        assert_relative_eq!(end.translation.vector, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn frame_offset_and_fps_applied() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let config = AnimationConfig {
            fps: 30.0,
            frame_offset: 100,
            ..AnimationConfig::default()
        };
        let trajectory =
            Trajectory::new(vec![JointStateSample::new(0.5).with("slide", 0.25)]).unwrap();
        animate(&mut world, &robot, &trajectory, &config).unwrap();
        let key = track(&world, &robot, "slide").at_frame(115).unwrap();
        assert_relative_eq!(key.pose.translation.vector, Vector3::new(0.25, 0.0, 0.0));
    }

    #[test]
    fn unknown_joints_reported_not_fatal() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let trajectory = Trajectory::new(vec![
            JointStateSample::new(0.0).with("joint1", 0.1).with("ghost", 1.0),
            JointStateSample::new(1.0).with("ghost", 2.0),
        ])
        .unwrap();
        let report = animate(&mut world, &robot, &trajectory, &AnimationConfig::default()).unwrap();
        assert_eq!(report.samples, 2);
        assert_eq!(report.keyframes, 1);
        assert_eq!(report.animated_joints, vec!["joint1"]);
        assert_eq!(report.unknown_joints.get("ghost"), Some(&2));
        assert!(report.summary().ends_with("skipped 2 values for unknown joints ghost"));
    }

    #[test]
    fn fixed_joint_keyed_at_rest() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let trajectory = Trajectory::new(vec![JointStateSample::new(0.0).with("weld", 5.0)]).unwrap();
        animate(&mut world, &robot, &trajectory, &AnimationConfig::default()).unwrap();
        let key = track(&world, &robot, "weld").at_frame(0).unwrap();
        assert_relative_eq!(key.pose.translation.vector, Vector3::new(0.0, 0.0, 0.2));
        assert_relative_eq!(key.pose.rotation.angle(), 0.0);
    }

    #[test]
    fn invalid_fps_rejected() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let config = AnimationConfig {
            fps: 0.0,
            ..AnimationConfig::default()
        };
        let err = animate(&mut world, &robot, &Trajectory::default(), &config).unwrap_err();
        assert!(matches!(err, TrajectoryError::Config(_)));
    }

    #[test]
    fn pose_frame_keys_single_frame() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let config = AnimationConfig::default();
        let report =
            pose_frame(&mut world, &robot, 48, &[("joint1", 0.5), ("spin", 1.0)], &config).unwrap();
        assert_eq!(report.keyframes, 2);
        let key = track(&world, &robot, "joint1").at_frame(48).unwrap();
        assert_relative_eq!(key.time, 2.0);
        assert_relative_eq!(key.value, 0.5);
    }

    #[test]
    fn apply_pose_at_scrubs_timeline() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let trajectory = Trajectory::new(vec![
            JointStateSample::new(0.0).with("joint1", 0.0),
            JointStateSample::new(2.0).with("joint1", 1.0),
        ])
        .unwrap();
        animate(&mut world, &robot, &trajectory, &AnimationConfig::default()).unwrap();

        assert_eq!(apply_pose_at(&mut world, &robot, 1.0), 1);
        let arm = robot.link_entity("arm").unwrap();
        let pose = world.get::<LocalPose>(arm).unwrap().0;
        assert_relative_eq!(pose.rotation.angle(), 0.5, epsilon = 1e-5);

        clear_animation(&mut world, &robot);
        assert!(world.get::<AnimationTrack>(arm).is_none());
    }

    #[test]
    fn continuous_full_turn_plays_back_through_half_turn() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let trajectory = Trajectory::new(vec![
            JointStateSample::new(0.0).with("spin", 0.0),
            JointStateSample::new(1.0).with("spin", TAU),
        ])
        .unwrap();
        animate(&mut world, &robot, &trajectory, &AnimationConfig::default()).unwrap();
        let wheel = robot.link_entity("wheel").unwrap();

        apply_pose_at(&mut world, &robot, 0.25);
        let quarter = world.get::<LocalPose>(wheel).unwrap().0;
        let expected = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        assert_relative_eq!(quarter.rotation.angle_to(&expected), 0.0, epsilon = 1e-4);

        apply_pose_at(&mut world, &robot, 0.5);
        let half = world.get::<LocalPose>(wheel).unwrap().0;
        assert_relative_eq!(half.rotation.angle(), PI, epsilon = 1e-3);
    }

    #[test]
    fn revolute_swing_past_half_turn_keeps_direction() {
        let mut world = World::new();
        let robot = robot(&mut world);
        let config = AnimationConfig::default();
        pose_frame(&mut world, &robot, 0, &[("joint1", -1.6)], &config).unwrap();
        pose_frame(&mut world, &robot, 24, &[("joint1", 1.6)], &config).unwrap();

        apply_pose_at(&mut world, &robot, 0.25);
        let arm = robot.link_entity("arm").unwrap();
        let pose = world.get::<LocalPose>(arm).unwrap().0;
        let expected = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -0.8);
        assert_relative_eq!(pose.rotation.angle_to(&expected), 0.0, epsilon = 1e-4);
        assert_relative_eq!(pose.translation.vector, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn samples_on_same_frame_count_once() {
        let mut world = World::new();
        let robot = robot(&mut world);
        // Both times round to frame 0 at 24 fps.
        let trajectory = Trajectory::new(vec![
            JointStateSample::new(0.0).with("joint1", 0.1),
            JointStateSample::new(0.01).with("joint1", 0.2),
        ])
        .unwrap();
        let report = animate(&mut world, &robot, &trajectory, &AnimationConfig::default()).unwrap();
        assert_eq!(report.samples, 2);
        assert_eq!(report.keyframes, 1);
        assert_eq!(report.overwritten, 1);
        let track = track(&world, &robot, "joint1");
        assert_eq!(track.len(), 1);
        assert_relative_eq!(track.at_frame(0).unwrap().value, 0.2);
    }
}
