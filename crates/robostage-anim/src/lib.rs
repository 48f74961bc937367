//! Joint trajectory animation for robostage.
//!
//! Loads joint trajectories from CSV, keys them onto a spawned robot as
//! per-joint [`AnimationTrack`]s, and plays them back by sampling the
//! tracks into the scene's local poses.

pub mod animator;
pub mod error;
pub mod track;
pub mod trajectory;

use bevy::prelude::*;
use robostage_scene::LocalPose;

pub use animator::{
    AnimationReport, animate, animate_from_csv, apply_pose_at, clear_animation, joint_value,
    pose_frame, wrap_angle,
};
pub use error::TrajectoryError;
pub use track::{AnimationTrack, Keyframe};
pub use trajectory::{CsvLayout, JointStateSample, Trajectory};

/// Current playback time in seconds.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    pub time: f32,
}

/// Sample every track into its node's [`LocalPose`] when the clock moves.
pub fn play_tracks(
    clock: Res<AnimationClock>,
    mut tracks: Query<(&AnimationTrack, &mut LocalPose)>,
) {
    if !clock.is_changed() {
        return;
    }
    for (track, mut pose) in &mut tracks {
        if let Some(sampled) = track.sample(clock.time) {
            pose.0 = sampled;
        }
    }
}

/// Registers [`AnimationClock`] and track playback.
pub struct RoboStageAnimPlugin;

impl Plugin for RoboStageAnimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationClock>()
            .add_systems(Update, play_tracks);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use robostage_core::{AnimationConfig, ImportConfig};
    use robostage_scene::import_robot_str;

    use super::*;

    #[test]
    fn clock_drives_playback() {
        let mut app = App::new();
        app.add_plugins(RoboStageAnimPlugin);
        let robot = import_robot_str(
            app.world_mut(),
            r#"<robot name="r">
                <link name="a"/><link name="b"/>
                <joint name="j" type="prismatic">
                    <parent link="a"/><child link="b"/><axis xyz="0 0 1"/>
                    <limit lower="0" upper="2" effort="1" velocity="1"/>
                </joint>
            </robot>"#,
            None,
            &ImportConfig::default(),
        )
        .unwrap();
        let trajectory = Trajectory::new(vec![
            JointStateSample::new(0.0).with("j", 0.0),
            JointStateSample::new(1.0).with("j", 2.0),
        ])
        .unwrap();
        animate(app.world_mut(), &robot, &trajectory, &AnimationConfig::default()).unwrap();

        app.world_mut().resource_mut::<AnimationClock>().time = 0.25;
        app.update();

        let b = robot.link_entity("b").unwrap();
        let z = app.world().get::<LocalPose>(b).unwrap().0.translation.z;
        assert!((z - 0.5).abs() < 1e-6);
    }
}
