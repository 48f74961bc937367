//! Robot scene graph construction for robostage.
//!
//! Turns a validated robot description into linked scene nodes in a Bevy
//! [`World`](bevy::prelude::World): one entity per link, parent/child
//! relations per joint, resolved visual geometry, and an [`ImportReport`]
//! of anything that could not be resolved.

pub mod components;
pub mod error;
pub mod report;
pub mod session;
pub mod spawner;

use bevy::prelude::*;

pub use components::{
    JointNode, LinkNode, LocalPose, PlaceholderGeometry, RestPose, RobotRoot, SceneChildren,
    SceneParent, Visuals, WorldPose,
};
pub use error::RoboStageError;
pub use report::ImportReport;
pub use session::{import_robot, import_robot_str};
pub use spawner::{
    SpawnOptions, SpawnedRobot, despawn_robot, joint_names_in_scene_order, spawn_robot,
    update_world_poses, world_pose,
};

/// Keeps [`WorldPose`] in sync with edited [`LocalPose`]s.
pub struct RoboStageScenePlugin;

impl Plugin for RoboStageScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, update_world_poses);
    }
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::RoboStageScenePlugin;
    pub use crate::components::{
        JointNode, LinkNode, LocalPose, RestPose, RobotRoot, SceneChildren, SceneParent, Visuals,
        WorldPose,
    };
    pub use crate::report::ImportReport;
    pub use crate::session::{import_robot, import_robot_str};
    pub use crate::spawner::{SpawnOptions, SpawnedRobot, despawn_robot, spawn_robot, world_pose};
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use robostage_core::ImportConfig;

    #[test]
    fn plugin_updates_world_poses() {
        let mut app = App::new();
        app.add_plugins(RoboStageScenePlugin);
        let robot = import_robot_str(
            app.world_mut(),
            r#"<robot name="r">
                <link name="a"/><link name="b"/>
                <joint name="j" type="prismatic">
                    <parent link="a"/><child link="b"/><axis xyz="1 0 0"/>
                    <limit lower="0" upper="1" effort="1" velocity="1"/>
                </joint>
            </robot>"#,
            None,
            &ImportConfig::default(),
        )
        .unwrap();

        let root = robot.root;
        app.world_mut().get_mut::<LocalPose>(root).unwrap().0 =
            nalgebra::Isometry3::translation(0.0, 0.0, 2.0);
        app.update();

        let b = robot.link_entity("b").unwrap();
        let z = app.world().get::<WorldPose>(b).unwrap().0.translation.z;
        assert!((z - 2.0).abs() < 1e-6);
    }
}
