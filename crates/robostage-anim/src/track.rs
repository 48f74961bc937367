//! Per-joint keyframe tracks.

use bevy::prelude::*;
use nalgebra::Isometry3;
use robostage_urdf::{JointType, joint_motion};

/// A keyed joint state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Trajectory time in seconds.
    pub time: f32,
    /// Timeline frame the key sits on.
    pub frame: i64,
    /// Joint value after unit conversion and wrapping.
    pub value: f32,
    /// Local pose of the joint's child node.
    pub pose: Isometry3<f32>,
}

/// Keyframes of one joint, stored on the node the joint moves.
///
/// Keys are ordered by frame; keying an occupied frame replaces the
/// existing key. Playback interpolates the joint value and rebuilds the
/// pose from the joint's rest pose and motion, so swings of more than half
/// a turn and multi-turn continuous values replay as keyed.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    pub joint: String,
    pub joint_type: JointType,
    /// Motion axis in the joint frame.
    pub axis: [f32; 3],
    /// Local pose of the node at zero joint displacement.
    pub rest: Isometry3<f32>,
    keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    pub fn new(
        joint: impl Into<String>,
        joint_type: JointType,
        axis: [f32; 3],
        rest: Isometry3<f32>,
    ) -> Self {
        Self {
            joint: joint.into(),
            joint_type,
            axis,
            rest,
            keyframes: Vec::new(),
        }
    }

    /// Add `key`. Returns `true` when it replaced a key on the same frame.
    pub fn insert(&mut self, key: Keyframe) -> bool {
        match self.keyframes.binary_search_by_key(&key.frame, |k| k.frame) {
            Ok(i) => {
                self.keyframes[i] = key;
                true
            }
            Err(i) => {
                self.keyframes.insert(i, key);
                false
            }
        }
    }

    /// Local pose for a joint value.
    pub fn pose_for(&self, value: f32) -> Isometry3<f32> {
        self.rest * joint_motion(self.joint_type, self.axis, value)
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn at_frame(&self, frame: i64) -> Option<&Keyframe> {
        self.keyframes
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
            .map(|i| &self.keyframes[i])
    }

    /// First and last keyed frame.
    pub fn frame_range(&self) -> Option<(i64, i64)> {
        Some((self.keyframes.first()?.frame, self.keyframes.last()?.frame))
    }

    /// The two keys around `time` and the blend factor between them.
    /// Outside the keyed range both keys are the nearest end key.
    fn bracket(&self, time: f32) -> Option<(&Keyframe, &Keyframe, f32)> {
        let first = self.keyframes.first()?;
        let idx = self.keyframes.partition_point(|k| k.time <= time);
        if idx == 0 {
            return Some((first, first, 0.0));
        }
        let a = &self.keyframes[idx - 1];
        let Some(b) = self.keyframes.get(idx) else {
            return Some((a, a, 0.0));
        };
        let span = b.time - a.time;
        let alpha = if span > 0.0 { (time - a.time) / span } else { 0.0 };
        Some((a, b, alpha))
    }

    /// Pose at `time`, from the interpolated joint value. Held constant
    /// outside the keyed range.
    pub fn sample(&self, time: f32) -> Option<Isometry3<f32>> {
        self.value_at(time).map(|value| self.pose_for(value))
    }

    /// Linearly interpolated joint value at `time`.
    pub fn value_at(&self, time: f32) -> Option<f32> {
        let (a, b, alpha) = self.bracket(time)?;
        Some(a.value + (b.value - a.value) * alpha)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, TAU};

    use approx::assert_relative_eq;
    use nalgebra::{Translation3, UnitQuaternion, Vector3};

    use super::*;

    const Z: [f32; 3] = [0.0, 0.0, 1.0];

    fn revolute() -> AnimationTrack {
        AnimationTrack::new(
            "j",
            JointType::Revolute,
            Z,
            Isometry3::from_parts(Translation3::new(0.0, 0.0, 1.0), UnitQuaternion::identity()),
        )
    }

    fn key(track: &AnimationTrack, time: f32, frame: i64, value: f32) -> Keyframe {
        Keyframe {
            time,
            frame,
            value,
            pose: track.pose_for(value),
        }
    }

    fn signed_angle_about_z(pose: &Isometry3<f32>) -> f32 {
        pose.rotation
            .axis_angle()
            .map_or(0.0, |(axis, angle)| angle * axis.z.signum())
    }

    #[test]
    fn keys_sorted_and_replaced() {
        let mut track = revolute();
        assert!(!track.insert(key(&track, 1.0, 24, 1.0)));
        assert!(!track.insert(key(&track, 0.0, 0, 0.0)));
        assert!(track.insert(key(&track, 1.0, 24, 0.5)));
        assert_eq!(track.len(), 2);
        assert_eq!(track.frame_range(), Some((0, 24)));
        assert_relative_eq!(track.at_frame(24).unwrap().value, 0.5);
        assert!(track.at_frame(12).is_none());
    }

    #[test]
    fn sample_interpolates_between_keys() {
        let mut track = revolute();
        track.insert(key(&track, 0.0, 0, 0.0));
        track.insert(key(&track, 1.0, 24, FRAC_PI_2));
        let mid = track.sample(0.5).unwrap();
        assert_relative_eq!(mid.rotation.angle(), FRAC_PI_2 / 2.0, epsilon = 1e-5);
        assert_relative_eq!(mid.translation.vector, Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(track.value_at(0.25).unwrap(), FRAC_PI_2 / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn wide_revolute_swing_keeps_direction() {
        let mut track = revolute();
        track.insert(key(&track, 0.0, 0, 0.0));
        track.insert(key(&track, 1.0, 24, 3.2));
        let mid = track.sample(0.5).unwrap();
        assert_relative_eq!(signed_angle_about_z(&mid), 1.6, epsilon = 1e-5);
        let late = track.sample(0.9).unwrap();
        let expected = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 2.88);
        assert_relative_eq!(late.rotation.angle_to(&expected), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn full_continuous_turn_moves_through_half_turn() {
        let mut track =
            AnimationTrack::new("spin", JointType::Continuous, Z, Isometry3::identity());
        track.insert(key(&track, 0.0, 0, 0.0));
        track.insert(key(&track, 1.0, 24, TAU));
        // Both ends sit at the same orientation, the middle is half a turn away.
        let half = track.sample(0.5).unwrap();
        assert_relative_eq!(half.rotation.angle(), TAU / 2.0, epsilon = 1e-3);
        assert_relative_eq!(
            signed_angle_about_z(&track.sample(0.25).unwrap()),
            TAU / 4.0,
            epsilon = 1e-5
        );
        assert_relative_eq!(track.value_at(0.75).unwrap(), 0.75 * TAU, epsilon = 1e-5);
    }

    #[test]
    fn prismatic_track_translates() {
        let mut track = AnimationTrack::new(
            "slide",
            JointType::Prismatic,
            [1.0, 0.0, 0.0],
            Isometry3::identity(),
        );
        track.insert(key(&track, 0.0, 0, 0.0));
        track.insert(key(&track, 2.0, 48, 1.0));
        let mid = track.sample(1.0).unwrap();
        assert_relative_eq!(mid.translation.vector, Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn sample_holds_outside_range() {
        let mut track = revolute();
        track.insert(key(&track, 1.0, 24, 0.3));
        track.insert(key(&track, 2.0, 48, 0.6));
        assert_relative_eq!(track.value_at(-5.0).unwrap(), 0.3);
        assert_relative_eq!(track.value_at(9.0).unwrap(), 0.6);
        assert_relative_eq!(track.sample(9.0).unwrap().rotation.angle(), 0.6, epsilon = 1e-6);
    }

    #[test]
    fn empty_track_samples_nothing() {
        let track = revolute();
        assert!(track.sample(0.0).is_none());
        assert!(track.frame_range().is_none());
    }
}
