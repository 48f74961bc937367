//! Scene graph construction from a validated [`RobotModel`].
//!
//! Every link becomes one entity. Joints become parent/child relations
//! between link entities, with the joint's origin and motion stored as the
//! child's [`LocalPose`].

use std::collections::HashMap;

use bevy::log::warn;
use bevy::prelude::*;
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use robostage_assets::{GeometryResolver, LinkGeometry};
use robostage_core::ImportConfig;
use robostage_urdf::{KinematicTree, RobotModel, StructuralError, child_pose, origin_to_isometry};

use crate::components::{
    JointNode, LinkNode, LocalPose, PlaceholderGeometry, RestPose, RobotRoot, SceneChildren,
    SceneParent, Visuals, WorldPose,
};
use crate::report::ImportReport;

// ---------------------------------------------------------------------------
// SpawnOptions
// ---------------------------------------------------------------------------

/// Placement of a robot in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnOptions {
    /// Pose of the root node.
    pub base_pose: Isometry3<f32>,
    /// Joint displacements used for the spawned pose. Missing joints are
    /// at zero.
    pub initial_positions: HashMap<String, f32>,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            base_pose: Isometry3::identity(),
            initial_positions: HashMap::new(),
        }
    }
}

impl SpawnOptions {
    pub fn from_config(config: &ImportConfig) -> Self {
        let [x, y, z] = config.base_position;
        let [qx, qy, qz, qw] = config.base_orientation;
        Self {
            base_pose: Isometry3::from_parts(
                Translation3::new(x, y, z),
                UnitQuaternion::from_quaternion(Quaternion::new(qw, qx, qy, qz)),
            ),
            initial_positions: config.initial_joint_positions.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpawnedRobot
// ---------------------------------------------------------------------------

/// Handle to a robot in the scene.
#[derive(Debug, Clone)]
pub struct SpawnedRobot {
    pub name: String,
    pub root: Entity,
    /// Link name → node.
    pub links: HashMap<String, Entity>,
    /// Joint name → the joint's child node.
    pub joints: HashMap<String, Entity>,
    pub report: ImportReport,
}

impl SpawnedRobot {
    pub fn link_entity(&self, name: &str) -> Option<Entity> {
        self.links.get(name).copied()
    }

    /// Node moved by the named joint.
    pub fn joint_entity(&self, name: &str) -> Option<Entity> {
        self.joints.get(name).copied()
    }

    pub fn node_count(&self) -> usize {
        self.links.len()
    }
}

// ---------------------------------------------------------------------------
// spawn_robot
// ---------------------------------------------------------------------------

/// Build the scene graph of `model` in `world`.
///
/// The link graph is validated first; on a [`StructuralError`] the world
/// is left untouched. Geometry that fails to resolve leaves the link with
/// empty visuals and a [`PlaceholderGeometry`] marker, and is recorded in
/// the returned robot's [`ImportReport`].
pub fn spawn_robot(
    world: &mut World,
    model: &RobotModel,
    resolver: &mut GeometryResolver,
    options: &SpawnOptions,
) -> Result<SpawnedRobot, StructuralError> {
    let tree = KinematicTree::build(model)?;

    for name in options.initial_positions.keys() {
        if model.joint(name).is_err() {
            warn!("{}: initial position for unknown joint {name} ignored", model.name());
        }
    }

    let mut report = ImportReport::new(model.name());
    let mut geometry: HashMap<&str, LinkGeometry> = HashMap::with_capacity(model.links().len());
    for link in model.links() {
        let resolved = resolver.resolve_link(link);
        // The failures stay on the geometry so the node gets its placeholder marker.
        for error in &resolved.failures {
            report.record(link.name.clone(), error.clone());
        }
        geometry.insert(link.name.as_str(), resolved);
    }

    let mut links = HashMap::with_capacity(model.links().len());
    let mut joints = HashMap::with_capacity(model.joints().len());

    let root_name = tree.root();
    let root = spawn_node(
        world,
        model,
        root_name,
        geometry.remove(root_name),
        (options.base_pose, options.base_pose),
        Isometry3::identity(),
    );
    world.entity_mut(root).insert(RobotRoot {
        name: model.name().to_string(),
    });
    links.insert(root_name.to_string(), root);

    for joint_name in tree.joint_order() {
        let Ok(joint) = model.joint(joint_name) else {
            continue;
        };
        let Some(&parent) = links.get(&joint.parent) else {
            continue;
        };
        let position = options
            .initial_positions
            .get(&joint.name)
            .copied()
            .unwrap_or(0.0);
        let rest = origin_to_isometry(&joint.origin);
        let local = child_pose(joint, position);

        let parent_world = world
            .get::<WorldPose>(parent)
            .map_or_else(Isometry3::identity, |p| p.0);
        let child = spawn_node(
            world,
            model,
            &joint.child,
            geometry.remove(joint.child.as_str()),
            (local, rest),
            parent_world,
        );
        world
            .entity_mut(child)
            .insert((JointNode::from_joint(joint), SceneParent(parent)));
        if let Some(mut children) = world.get_mut::<SceneChildren>(parent) {
            children.0.push(child);
        }

        links.insert(joint.child.clone(), child);
        joints.insert(joint.name.clone(), child);
    }

    report.link_count = links.len();
    report.joint_count = joints.len();

    Ok(SpawnedRobot {
        name: model.name().to_string(),
        root,
        links,
        joints,
        report,
    })
}

fn spawn_node(
    world: &mut World,
    model: &RobotModel,
    link: &str,
    geometry: Option<LinkGeometry>,
    (local, rest): (Isometry3<f32>, Isometry3<f32>),
    parent_world: Isometry3<f32>,
) -> Entity {
    let geometry = geometry.unwrap_or_default();
    let mut entity = world.spawn((
        LinkNode {
            link: link.to_string(),
            robot: model.name().to_string(),
        },
        LocalPose(local),
        RestPose(rest),
        WorldPose(parent_world * local),
        SceneChildren::default(),
        Visuals(geometry.visuals),
    ));
    if !geometry.failures.is_empty() {
        entity.insert(PlaceholderGeometry(geometry.failures.len()));
    }
    entity.id()
}

// ---------------------------------------------------------------------------
// Scene queries
// ---------------------------------------------------------------------------

/// Remove every node of `robot` from the world. Returns the number of
/// entities removed.
pub fn despawn_robot(world: &mut World, robot: &SpawnedRobot) -> usize {
    robot
        .links
        .values()
        .filter(|&&entity| world.despawn(entity))
        .count()
}

/// Pose of `entity` in the world frame, composed up the parent chain.
pub fn world_pose(world: &World, entity: Entity) -> Option<Isometry3<f32>> {
    let mut pose = world.get::<LocalPose>(entity)?.0;
    let mut current = entity;
    while let Some(parent) = world.get::<SceneParent>(current) {
        current = parent.0;
        pose = world.get::<LocalPose>(current)?.0 * pose;
    }
    Some(pose)
}

/// Joint names of `robot` in scene order: parents before children, siblings
/// in declaration order.
pub fn joint_names_in_scene_order(world: &World, robot: &SpawnedRobot) -> Vec<String> {
    let mut out = Vec::with_capacity(robot.joints.len());
    let mut stack = vec![robot.root];
    while let Some(entity) = stack.pop() {
        if let Some(joint) = world.get::<JointNode>(entity) {
            out.push(joint.joint.clone());
        }
        if let Some(children) = world.get::<SceneChildren>(entity) {
            stack.extend(children.0.iter().rev());
        }
    }
    out
}

/// Recompute [`WorldPose`] for every robot from its root down.
pub fn update_world_poses(
    roots: Query<Entity, With<RobotRoot>>,
    nodes: Query<(&LocalPose, &SceneChildren)>,
    mut poses: Query<&mut WorldPose>,
) {
    for root in &roots {
        let mut stack = vec![(root, Isometry3::identity())];
        while let Some((entity, parent)) = stack.pop() {
            let Ok((local, children)) = nodes.get(entity) else {
                continue;
            };
            let pose = parent * local.0;
            if let Ok(mut world_pose) = poses.get_mut(entity) {
                if world_pose.0 != pose {
                    world_pose.0 = pose;
                }
            }
            stack.extend(children.0.iter().map(|&child| (child, pose)));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
