//! Scene graph components attached to spawned robot nodes.

use bevy::prelude::*;
use nalgebra::Isometry3;
use robostage_assets::ResolvedVisual;
use robostage_urdf::{JointData, JointType};

/// One node per description link.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    pub link: String,
    pub robot: String,
}

/// Marks the root node of a robot.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct RobotRoot {
    pub name: String,
}

/// The joint that connects a node to its parent. Absent on the root.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct JointNode {
    pub joint: String,
    pub joint_type: JointType,
    /// Unit motion axis in the joint frame.
    pub axis: [f32; 3],
    pub lower: Option<f32>,
    pub upper: Option<f32>,
}

impl JointNode {
    pub fn from_joint(joint: &JointData) -> Self {
        Self {
            joint: joint.name.clone(),
            joint_type: joint.joint_type,
            axis: joint.axis,
            lower: joint.limits.lower,
            upper: joint.limits.upper,
        }
    }
}

/// Pose of a node relative to its parent.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LocalPose(pub Isometry3<f32>);

/// Pose of a node in the world frame, kept in sync with [`LocalPose`] by
/// [`update_world_poses`](crate::spawner::update_world_poses).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WorldPose(pub Isometry3<f32>);

/// Pose of a node relative to its parent at zero joint displacement.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RestPose(pub Isometry3<f32>);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneParent(pub Entity);

#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneChildren(pub Vec<Entity>);

/// Resolved visual geometry of a link.
#[derive(Component, Debug, Clone, Default)]
pub struct Visuals(pub Vec<ResolvedVisual>);

/// Set on nodes whose geometry failed to resolve; holds the number of
/// failed visuals.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderGeometry(pub usize);
