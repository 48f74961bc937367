//! Rigid transforms for URDF origins and joint motion.

use nalgebra::{Isometry3, Matrix3, Rotation3, Translation3, UnitQuaternion, Unit, Vector3};

use crate::types::{JointData, JointType, Origin};

/// Convert a URDF [`Origin`] (xyz + rpy) to an [`Isometry3`].
pub fn origin_to_isometry(origin: &Origin) -> Isometry3<f32> {
    let translation = Translation3::new(origin.xyz[0], origin.xyz[1], origin.xyz[2]);
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
        rotation_matrix_from_rpy(origin.rpy[0], origin.rpy[1], origin.rpy[2]),
    ));
    Isometry3::from_parts(translation, rotation)
}

/// Build a rotation matrix from roll-pitch-yaw (fixed-axis XYZ, as URDF
/// defines it: `Rz(yaw) * Ry(pitch) * Rx(roll)`).
fn rotation_matrix_from_rpy(roll: f32, pitch: f32, yaw: f32) -> Matrix3<f32> {
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();

    Matrix3::new(
        cy * cp,
        cy * sp * sr - sy * cr,
        cy * sp * cr + sy * sr,
        sy * cp,
        sy * sp * sr + cy * cr,
        sy * sp * cr - cy * sr,
        -sp,
        cp * sr,
        cp * cr,
    )
}

/// Displacement produced by a joint at a scalar position.
///
/// Rotation about `axis` for revolute and continuous joints, translation
/// along `axis` for prismatic joints, identity for everything else.
pub fn joint_motion(joint_type: JointType, axis: [f32; 3], position: f32) -> Isometry3<f32> {
    let axis = Vector3::new(axis[0], axis[1], axis[2]);
    match joint_type {
        JointType::Revolute | JointType::Continuous => {
            let Some(axis) = Unit::try_new(axis, 1e-9) else {
                return Isometry3::identity();
            };
            Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&axis, position),
            )
        }
        JointType::Prismatic => Isometry3::from_parts(
            Translation3::from(axis * position),
            UnitQuaternion::identity(),
        ),
        JointType::Fixed | JointType::Floating | JointType::Planar => Isometry3::identity(),
    }
}

/// Local pose of a joint's child link at `position`: the joint origin
/// followed by the joint motion.
pub fn child_pose(joint: &JointData, position: f32) -> Isometry3<f32> {
    origin_to_isometry(&joint.origin) * joint_motion(joint.joint_type, joint.axis, position)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn zero_origin_is_identity() {
        let iso = origin_to_isometry(&Origin::default());
        assert_relative_eq!(iso, Isometry3::identity(), epsilon = 1e-6);
    }

    #[test]
    fn rpy_yaw_rotates_about_z() {
        let origin = Origin {
            xyz: [1.0, 2.0, 3.0],
            rpy: [0.0, 0.0, FRAC_PI_2],
        };
        let iso = origin_to_isometry(&origin);
        let p = iso * nalgebra::Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn rpy_matches_nalgebra_euler() {
        let (r, p, y) = (0.3, -0.7, 1.1);
        let iso = origin_to_isometry(&Origin {
            xyz: [0.0; 3],
            rpy: [r, p, y],
        });
        let expected = UnitQuaternion::from_euler_angles(r, p, y);
        assert_relative_eq!(iso.rotation.angle_to(&expected), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn revolute_motion_rotates() {
        let m = joint_motion(JointType::Revolute, [0.0, 0.0, 1.0], FRAC_PI_2);
        let v = m * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(v, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(m.translation.vector.norm(), 0.0);
    }

    #[test]
    fn prismatic_motion_translates() {
        let m = joint_motion(JointType::Prismatic, [0.0, 1.0, 0.0], 0.25);
        assert_relative_eq!(m.translation.vector, Vector3::new(0.0, 0.25, 0.0));
        assert_relative_eq!(m.rotation.angle(), 0.0);
    }

    #[test]
    fn fixed_motion_is_identity() {
        let m = joint_motion(JointType::Fixed, [0.0, 0.0, 1.0], 3.0);
        assert_relative_eq!(m, Isometry3::identity());
    }

    #[test]
    fn child_pose_composes_origin_then_motion() {
        let joint = JointData::new("j", JointType::Revolute, "a", "b")
            .with_origin(Origin::from_xyz(0.0, 0.0, 1.0))
            .with_axis([0.0, 0.0, 1.0]);
        let pose = child_pose(&joint, FRAC_PI_2);
        assert_relative_eq!(pose.translation.vector, Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(pose.rotation.angle(), FRAC_PI_2, epsilon = 1e-6);
    }
}
