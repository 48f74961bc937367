//! End-to-end import scenarios through the public entry points.

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use robostage_core::ImportConfig;
use robostage_scene::prelude::*;
use robostage_scene::{PlaceholderGeometry, RoboStageError};
use robostage_test_utils::{
    ARM_URDF, TWO_PARENT_URDF, chain_urdf, minimal_test_app, parse_fixture, scene_test_app,
    write_temp,
};

#[test]
fn scene_graph_mirrors_the_description() {
    let mut app = minimal_test_app();
    let xml = chain_urdf(6, None);
    let model = parse_fixture(&xml);
    let robot = import_robot_str(app.world_mut(), &xml, None, &ImportConfig::default()).unwrap();

    assert_eq!(robot.node_count(), model.links().len());
    let world = app.world();
    for joint in model.joints() {
        let child = robot.link_entity(&joint.child).unwrap();
        let parent = robot.link_entity(&joint.parent).unwrap();
        assert_eq!(world.get::<SceneParent>(child).unwrap().0, parent);
        assert!(world.get::<SceneChildren>(parent).unwrap().0.contains(&child));
        assert_eq!(world.get::<JointNode>(child).unwrap().joint, joint.name);
    }
    assert!(world.get::<SceneParent>(robot.root).is_none());

    let names: HashSet<_> = world
        .iter_entities()
        .filter_map(|e| e.get::<LinkNode>().map(|l| l.link.clone()))
        .collect();
    let expected: HashSet<_> = model.links().iter().map(|l| l.name.clone()).collect();
    assert_eq!(names, expected);
}

#[test]
fn missing_mesh_keeps_every_node() {
    let dir = write_temp("chain.urdf", &chain_urdf(10, Some(3)));
    let mut app = minimal_test_app();
    let robot = import_robot(app.world_mut(), &dir, &ImportConfig::default()).unwrap();

    assert_eq!(robot.node_count(), 10);
    assert_eq!(robot.report.failure_count(), 1);
    assert_eq!(robot.report.affected_links(), ["link3"]);

    let world = app.world();
    let broken = robot.link_entity("link3").unwrap();
    assert!(world.get::<PlaceholderGeometry>(broken).is_some());
    assert!(world.get::<Visuals>(broken).unwrap().0.is_empty());
    let fine = robot.link_entity("link4").unwrap();
    assert_eq!(world.get::<Visuals>(fine).unwrap().0.len(), 1);
}

#[test]
fn arm_child_sits_one_meter_up() {
    let mut app = minimal_test_app();
    let robot = import_robot_str(app.world_mut(), ARM_URDF, None, &ImportConfig::default()).unwrap();
    assert!(robot.report.is_clean());

    let arm = robot.link_entity("arm").unwrap();
    let local = app.world().get::<LocalPose>(arm).unwrap().0;
    assert!((local.translation.vector - nalgebra::Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    assert!(local.rotation.angle() < 1e-6);
    assert_eq!(robot.joint_entity("joint1"), Some(arm));
}

#[test]
fn initial_positions_and_base_pose_apply() {
    let mut app = scene_test_app();
    let config = ImportConfig {
        base_position: [2.0, 0.0, 0.0],
        initial_joint_positions: [("joint1".to_string(), FRAC_PI_2)].into(),
        ..ImportConfig::default()
    };
    let robot = import_robot_str(app.world_mut(), ARM_URDF, None, &config).unwrap();
    app.update();

    let arm = robot.link_entity("arm").unwrap();
    let pose = app.world().get::<WorldPose>(arm).unwrap().0;
    assert!((pose.translation.vector - nalgebra::Vector3::new(2.0, 0.0, 1.0)).norm() < 1e-6);
    assert!((pose.rotation.angle() - FRAC_PI_2).abs() < 1e-5);
    // The rest pose ignores the initial displacement.
    let rest = app.world().get::<RestPose>(arm).unwrap().0;
    assert!(rest.rotation.angle() < 1e-6);
}

#[test]
fn two_parents_leave_the_world_untouched() {
    let mut app = minimal_test_app();
    let before = app.world().entities().len();
    let err = import_robot_str(
        app.world_mut(),
        TWO_PARENT_URDF,
        None,
        &ImportConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RoboStageError::Structural(_)));
    assert_eq!(app.world().entities().len(), before);
}

#[test]
fn malformed_description_is_a_parse_error() {
    let mut app = minimal_test_app();
    let err = import_robot_str(
        app.world_mut(),
        "<robot name=\"x\"><link",
        None,
        &ImportConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RoboStageError::Parse(_)));
}

#[test]
fn despawn_removes_every_node() {
    let mut app = minimal_test_app();
    let before = app.world().entities().len();
    let robot = import_robot_str(
        app.world_mut(),
        &chain_urdf(4, None),
        None,
        &ImportConfig::default(),
    )
    .unwrap();
    assert_eq!(despawn_robot(app.world_mut(), &robot), 4);
    assert_eq!(app.world().entities().len(), before);
}
